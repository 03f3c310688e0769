// Typed Record Store - Core Library
// Exposes all modules for use in the CLI and tests

pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod records;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use aggregate::{max_of, mean, min_of, sum};
pub use config::{PartialPairPolicy, StoreConfig};
pub use dispatch::{
    classify, dispatch_all, dispatch_one, parse_json_array,
    DispatchReport, FieldPair, Key, Rejected, Shape,
};
pub use error::{DispatchError, Result, StoreError};
pub use ledger::{display_all, CarLedger, LoadReport, SkippedRow};
pub use records::{
    Car, CarMismatch,
    Person, PersonKind,
    Vehicle, VehicleKind,
    TypedRecord,
};
pub use store::RecordStore;
pub use validation::{validate_person, validate_vehicle, FieldIssue};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
