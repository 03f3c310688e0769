// Typed Records
//
// Each family is a sum type: the fields shared by every variant live on the
// struct, the discriminating pair lives inside the variant. `TypedRecord` is the
// seam the dispatcher and the in-memory store work through.

pub mod car;
pub mod person;
pub mod vehicle;

pub use car::{Car, CarMismatch};
pub use person::{Person, PersonKind};
pub use vehicle::{Vehicle, VehicleKind};

use crate::dispatch::{FieldPair, Shape};
use crate::error::DispatchError;
use serde_json::{Map, Value};

/// A record family that can be dispatched from a loosely-typed field map
pub trait TypedRecord: Clone + Sized {
    /// Family name used in diagnostics ("vehicle", "person")
    const FAMILY: &'static str;

    /// Discriminating pairs, highest priority first
    fn field_pairs() -> &'static [FieldPair];

    /// Build from fields already classified as `Shape::Variant` or `Shape::Base`
    fn build(fields: &Map<String, Value>, shape: Shape) -> Result<Self, DispatchError>;

    /// Back to a field map carrying only this variant's pair
    fn to_fields(&self) -> Map<String, Value>;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Variant label ("land", "air", "base", ...)
    fn kind(&self) -> &'static str;
}
