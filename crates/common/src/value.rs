//! Runtime value representation for the triad VM.
//!
//! Values live in variable slots and on the operand stack. They are
//! immutable; every operation produces a new value.

use std::cmp::Ordering;
use std::fmt;

use crate::type_tag::TypeTag;

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// String, indexed by Unicode scalar value.
    Str(String),
    /// The `nil` value.
    Nil,
}

impl Value {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::String,
            Value::Nil => TypeTag::Nil,
        }
    }

    /// Ordering used by LT/GT.
    ///
    /// Defined only for two values of the same non-nil type. Booleans order
    /// `false < true`; strings order by code point.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality used by EQ and the conditional jumps.
    ///
    /// Defined when both values share a type or either is `nil`; `nil`
    /// equals only `nil`.
    pub fn loose_eq(&self, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::Nil, _) | (_, Value::Nil) => Some(self == other),
            _ if self.type_tag() == other.type_tag() => Some(self == other),
            _ => None,
        }
    }

    /// Text printed by WRITE. `nil` prints nothing.
    pub fn output_text(&self) -> String {
        match self {
            Value::Nil => String::new(),
            other => other.to_string(),
        }
    }
}

/// Canonical text of a value: base-10 integers, `true`/`false`, the string
/// itself, and `nil`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Nil => f.write_str("nil"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
