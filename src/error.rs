// ⚠️ Error Types
// Every failure degrades to an empty/neutral result at the edges; inside the
// library it is a typed error so callers can tell the cases apart.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the store
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the persistent stores and the in-memory store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store file could not be opened (missing, permissions, ...)
    #[error("could not open store '{}': {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("delimited store error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Row present but its fields could not be parsed
    #[error("invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("a record with id {0} already exists")]
    DuplicateId(i64),

    #[error("no record with id {0}")]
    NotFound(i64),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// Price is NaN or infinite and would not read back as a number
    #[error("price must be a finite number, got {0}")]
    InvalidPrice(f64),
}

/// Why a loosely-typed input could not become a typed record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(String),

    /// Only one half of a discriminating pair was present
    #[error("incomplete field pair for {variant}: '{present}' present, '{missing}' missing")]
    PartialPair {
        variant: &'static str,
        present: &'static str,
        missing: &'static str,
    },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("id {0} appears more than once")]
    DuplicateId(i64),

    #[error("field '{field}' has an invalid value: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// Builder handed a shape it has no variant for
    #[error("cannot build a {family} from shape {shape}")]
    UnbuildableShape { family: &'static str, shape: String },
}

impl DispatchError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DispatchError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn unbuildable(family: &'static str, shape: impl std::fmt::Debug) -> Self {
        DispatchError::UnbuildableShape {
            family,
            shape: format!("{:?}", shape),
        }
    }

    /// True when the input was dropped only because of a half-present pair
    pub fn is_partial_pair(&self) -> bool {
        matches!(self, DispatchError::PartialPair { .. })
    }
}
