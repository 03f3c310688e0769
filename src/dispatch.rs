// 🔀 Variant Dispatcher
// Loosely-typed field maps → typed records, by which optional field pair is present
//
// Presence drives dispatch, not value validity: a key holding 0, "" or null
// still counts as present. Pairs are tested in a fixed priority order and the
// first complete pair wins; no complete pair and no half pair means the base
// variant.

use crate::config::PartialPairPolicy;
use crate::error::{DispatchError, Result as StoreResult};
use crate::records::TypedRecord;
use serde::Serialize;
use serde_json::{Map, Value};

// ============================================================================
// FIELD PAIRS & SHAPES
// ============================================================================

/// Input key with the other spellings it may arrive under
///
/// `name` is the canonical key: records serialize under it and errors report it.
/// The first of `name` and `aliases` found in a field map is the one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

impl Key {
    pub const fn new(name: &'static str) -> Self {
        Key { name, aliases: &[] }
    }

    pub const fn aliased(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Key { name, aliases }
    }

    pub fn lookup<'a>(&self, fields: &'a Map<String, Value>) -> Option<&'a Value> {
        fields
            .get(self.name)
            .or_else(|| self.aliases.iter().find_map(|alias| fields.get(*alias)))
    }

    pub fn is_present(&self, fields: &Map<String, Value>) -> bool {
        self.lookup(fields).is_some()
    }
}

impl From<&'static str> for Key {
    fn from(name: &'static str) -> Self {
        Key::new(name)
    }
}

/// The two keys that together identify one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPair {
    pub variant: &'static str,
    pub first: Key,
    pub second: Key,
}

impl FieldPair {
    pub const fn new(variant: &'static str, first: Key, second: Key) -> Self {
        FieldPair {
            variant,
            first,
            second,
        }
    }
}

/// Outcome of looking at which pairs a field map carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Index into the pair list of the first complete pair
    Variant(usize),

    /// No pair touched at all
    Base,

    /// No complete pair, but this one is half present
    Partial {
        pair: usize,
        present: &'static str,
        missing: &'static str,
    },
}

/// Classify a field map against pairs given in priority order
pub fn classify(fields: &Map<String, Value>, pairs: &[FieldPair]) -> Shape {
    if let Some(index) = pairs
        .iter()
        .position(|p| p.first.is_present(fields) && p.second.is_present(fields))
    {
        return Shape::Variant(index);
    }

    for (index, pair) in pairs.iter().enumerate() {
        match (pair.first.is_present(fields), pair.second.is_present(fields)) {
            (true, false) => {
                return Shape::Partial {
                    pair: index,
                    present: pair.first.name,
                    missing: pair.second.name,
                }
            }
            (false, true) => {
                return Shape::Partial {
                    pair: index,
                    present: pair.second.name,
                    missing: pair.first.name,
                }
            }
            _ => {}
        }
    }

    Shape::Base
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Build one typed record from a JSON value
pub fn dispatch_one<R: TypedRecord>(value: &Value) -> Result<R, DispatchError> {
    let fields = value
        .as_object()
        .ok_or_else(|| DispatchError::NotAnObject(json_kind(value).to_string()))?;

    let pairs = R::field_pairs();
    match classify(fields, pairs) {
        Shape::Partial {
            pair,
            present,
            missing,
        } => Err(DispatchError::PartialPair {
            variant: pairs[pair].variant,
            present,
            missing,
        }),
        shape => R::build(fields, shape),
    }
}

/// One input entry that did not become a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejected {
    /// Position in the input array
    pub index: usize,
    pub reason: String,
    #[serde(skip)]
    pub error: DispatchError,
}

impl Rejected {
    pub fn new(index: usize, error: DispatchError) -> Self {
        Rejected {
            index,
            reason: error.to_string(),
            error,
        }
    }
}

/// Records built from an input array, plus what was rejected
#[derive(Debug, Clone)]
pub struct DispatchReport<R> {
    pub records: Vec<R>,
    pub rejected: Vec<Rejected>,
}

impl<R> DispatchReport<R> {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Build records in input order
///
/// Invalid values are always reported. Half-present pairs are reported under
/// `PartialPairPolicy::Reject` and skipped quietly under `Drop`.
pub fn dispatch_all<R: TypedRecord>(values: &[Value], policy: PartialPairPolicy) -> DispatchReport<R> {
    let (indexed, rejected) = dispatch_indexed::<R>(values, policy);

    DispatchReport {
        records: indexed.into_iter().map(|(_, record)| record).collect(),
        rejected,
    }
}

/// Same as `dispatch_all`, each record paired with its input position
pub fn dispatch_indexed<R: TypedRecord>(
    values: &[Value],
    policy: PartialPairPolicy,
) -> (Vec<(usize, R)>, Vec<Rejected>) {
    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();

    for (index, value) in values.iter().enumerate() {
        match dispatch_one::<R>(value) {
            Ok(record) => records.push((index, record)),
            Err(error) if error.is_partial_pair() && policy == PartialPairPolicy::Drop => {
                tracing::debug!(index, family = R::FAMILY, reason = %error, "dropped partial record");
            }
            Err(error) => {
                tracing::warn!(index, family = R::FAMILY, reason = %error, "unrecognized record");
                rejected.push(Rejected::new(index, error));
            }
        }
    }

    (records, rejected)
}

/// Parse a JSON document that must be an array of entries
pub fn parse_json_array(text: &str) -> StoreResult<Vec<Value>> {
    Ok(serde_json::from_str::<Vec<Value>>(text)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// FIELD ACCESSORS
// ============================================================================
// Numbers may arrive as JSON numbers or as numeric strings (form input).
// Errors always name the canonical key, whichever alias carried the value.

fn field(fields: &Map<String, Value>, key: Key) -> Result<&Value, DispatchError> {
    key.lookup(fields).ok_or(DispatchError::MissingField(key.name))
}

pub fn require_f64(fields: &Map<String, Value>, key: impl Into<Key>) -> Result<f64, DispatchError> {
    let key = key.into();
    let value = field(fields, key)?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(n),
        _ => Err(DispatchError::invalid(key.name, format!("expected a number, got {}", value))),
    }
}

pub fn require_i64(fields: &Map<String, Value>, key: impl Into<Key>) -> Result<i64, DispatchError> {
    let key = key.into();
    let value = field(fields, key)?;
    let number = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    number.ok_or_else(|| DispatchError::invalid(key.name, format!("expected an integer, got {}", value)))
}

pub fn require_u32(fields: &Map<String, Value>, key: impl Into<Key>) -> Result<u32, DispatchError> {
    let key = key.into();
    let n = require_i64(fields, key)?;
    u32::try_from(n).map_err(|_| DispatchError::invalid(key.name, format!("{} is out of range", n)))
}

pub fn require_i32(fields: &Map<String, Value>, key: impl Into<Key>) -> Result<i32, DispatchError> {
    let key = key.into();
    let n = require_i64(fields, key)?;
    i32::try_from(n).map_err(|_| DispatchError::invalid(key.name, format!("{} is out of range", n)))
}

/// Text field; numbers are accepted and rendered as text (phone numbers)
pub fn require_string(fields: &Map<String, Value>, key: impl Into<Key>) -> Result<String, DispatchError> {
    let key = key.into();
    match field(fields, key)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(DispatchError::invalid(key.name, format!("expected text, got {}", other))),
    }
}

// ============================================================================
// TESTS
// ============================================================================
