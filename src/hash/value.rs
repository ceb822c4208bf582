//! Stored scalar values.
//!
//! A hash store keeps one loosely-typed scalar per field. Encoding produces
//! [`StoredValue`]s; decoding always starts from strings because that is all
//! the store hands back.

use std::fmt;

/// A loosely-typed scalar destined for one hash field.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// Signed integer, widened to 64 bits.
    Int(i64),
    /// Unsigned integer, widened to 64 bits.
    Uint(u64),
    /// Floating point, widened to 64 bits.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// String, including JSON text for composite values.
    Str(String),
    /// Absent optional field. Distinct from an empty string.
    Nil,
}

impl StoredValue {
    /// Returns true for the "no value" marker.
    pub fn is_nil(&self) -> bool {
        matches!(self, StoredValue::Nil)
    }

    /// Returns the scalar's type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            StoredValue::Int(_) => "int",
            StoredValue::Uint(_) => "uint",
            StoredValue::Float(_) => "float",
            StoredValue::Bool(_) => "bool",
            StoredValue::Str(_) => "string",
            StoredValue::Nil => "nil",
        }
    }
}

/// Renders the scalar the way a hash-store client writes it.
///
/// `Nil` renders as the empty string. Floats use the shortest representation
/// that parses back to the same value.
impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Int(v) => write!(f, "{}", v),
            StoredValue::Uint(v) => write!(f, "{}", v),
            StoredValue::Float(v) => write!(f, "{}", v),
            StoredValue::Bool(v) => write!(f, "{}", v),
            StoredValue::Str(v) => f.write_str(v),
            StoredValue::Nil => Ok(()),
        }
    }
}

impl From<i64> for StoredValue {
    fn from(v: i64) -> Self {
        StoredValue::Int(v)
    }
}

impl From<u64> for StoredValue {
    fn from(v: u64) -> Self {
        StoredValue::Uint(v)
    }
}

impl From<f64> for StoredValue {
    fn from(v: f64) -> Self {
        StoredValue::Float(v)
    }
}

impl From<bool> for StoredValue {
    fn from(v: bool) -> Self {
        StoredValue::Bool(v)
    }
}

impl From<String> for StoredValue {
    fn from(v: String) -> Self {
        StoredValue::Str(v)
    }
}

impl From<&str> for StoredValue {
    fn from(v: &str) -> Self {
        StoredValue::Str(v.to_owned())
    }
}
