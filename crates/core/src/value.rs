//! Value types for Roster
//!
//! This module defines the canonical Value type stored in record fields.
//!
//! ## Contract
//!
//! - No implicit type coercions
//! - IEEE-754 float equality semantics
//! - Bytes and String are distinct types
//! - Object keys are ordered, so two equal objects serialize identically

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical Roster Value type
///
/// ## The Eight Types
///
/// 1. `Null` - JSON null (only meaningful nested inside arrays/objects;
///    a top-level null in an update means "remove the field")
/// 2. `Bool` - Boolean true or false
/// 3. `Int` - 64-bit signed integer
/// 4. `Float` - 64-bit IEEE-754 floating point
/// 5. `String` - UTF-8 encoded string
/// 6. `Bytes` - Arbitrary binary data (distinct from String)
/// 7. `Array` - Ordered sequence of values
/// 8. `Object` - String-keyed map of values
///
/// ## Equality Rules
///
/// - Different types are NEVER equal (no type coercion)
/// - `Int(1)` != `Float(1.0)`
/// - `String("abc")` != `Bytes([97, 98, 99])`
/// - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// JSON null
    Null,

    /// Boolean true or false
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit IEEE-754 floating point
    Float(f64),

    /// UTF-8 encoded string
    String(String),

    /// Arbitrary binary data
    Bytes(Vec<u8>),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// String-keyed map of values
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the type name as a string (for error messages)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as bytes slice
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as array slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get as object reference
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754 equality: NaN != NaN, but -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,

            // Different types: never equal
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(a)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(o: BTreeMap<String, Value>) -> Self {
        Value::Object(o)
    }
}
