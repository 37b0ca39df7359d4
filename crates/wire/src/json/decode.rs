//! JSON decoding for Roster values
//!
//! Implements decoding of JSON to Value, handling special wrappers:
//! - `$bytes` for binary data (base64)
//! - `$f64` for special floats (NaN, ±Inf, -0.0)

use base64::Engine;
use roster_core::Value;
use serde_json::Value as Json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Decode error types
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Invalid JSON syntax
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Top-level value is not an object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Required key is absent
    #[error("Missing required key '{0}'")]
    MissingKey(&'static str),

    /// Record id is not a valid id string
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// expectedVersion is not a positive integer
    #[error("expectedVersion must be a positive integer, got {0}")]
    InvalidVersion(String),

    /// Request targets a field managed by the store
    #[error("field '{0}' is managed by the store and cannot be updated")]
    ReservedField(String),

    /// Field name is not acceptable
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Invalid base64 in $bytes wrapper
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    /// Invalid value in $f64 wrapper
    #[error("Invalid $f64 value: {0}")]
    InvalidF64Wrapper(String),
}

impl From<DecodeError> for roster_core::Error {
    fn from(e: DecodeError) -> Self {
        roster_core::Error::InvalidRequest(e.to_string())
    }
}

/// Decode a JSON string to Value
pub fn decode_json(json: &str) -> Result<Value, DecodeError> {
    let tree: Json = parse(json)?;
    from_json(tree)
}

/// Parse JSON text into a tree
pub(crate) fn parse(json: &str) -> Result<Json, DecodeError> {
    serde_json::from_str(json.trim()).map_err(|e| DecodeError::InvalidJson(e.to_string()))
}

/// Convert a JSON tree to a Value
///
/// Integers that fit `i64` become `Int`; every other number becomes `Float`.
pub fn from_json(json: Json) -> Result<Value, DecodeError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Json::String(s) => Value::String(s),
        Json::Array(arr) => Value::Array(
            arr.into_iter()
                .map(from_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Json::Object(obj) => {
            // Single-key objects with a $ prefix are wrappers
            if obj.len() == 1 {
                if let Some(Json::String(b64)) = obj.get("$bytes") {
                    return decode_bytes_wrapper(b64);
                }
                if let Some(Json::String(f)) = obj.get("$f64") {
                    return decode_f64_wrapper(f);
                }
            }
            let mut map = BTreeMap::new();
            for (k, v) in obj {
                map.insert(k, from_json(v)?);
            }
            Value::Object(map)
        }
    })
}

/// Name of a JSON value's type, for error messages
pub(crate) fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Decode $bytes wrapper (base64)
fn decode_bytes_wrapper(b64: &str) -> Result<Value, DecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    Ok(Value::Bytes(bytes))
}

/// Decode $f64 wrapper (special floats)
fn decode_f64_wrapper(value: &str) -> Result<Value, DecodeError> {
    let f = match value {
        "NaN" => f64::NAN,
        "+Inf" => f64::INFINITY,
        "-Inf" => f64::NEG_INFINITY,
        "-0.0" => -0.0_f64,
        _ => return Err(DecodeError::InvalidF64Wrapper(value.to_string())),
    };
    Ok(Value::Float(f))
}
