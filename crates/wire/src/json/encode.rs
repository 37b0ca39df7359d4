//! JSON encoding for Roster values and records
//!
//! Implements encoding of Value to JSON with special wrappers:
//! - `$bytes` for binary data (base64)
//! - `$f64` for special floats (NaN, ±Inf, -0.0)

use base64::Engine;
use roster_core::{Record, Value};
use serde_json::{Map, Number, Value as Json};

/// Record metadata key: id
pub const ID_KEY: &str = "id";
/// Record metadata key: version
pub const VERSION_KEY: &str = "version";
/// Record metadata key: last update time in milliseconds
pub const UPDATED_AT_KEY: &str = "updatedAt";

/// Convert a Value to a JSON tree
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => encode_float(*f),
        Value::String(s) => Json::String(s.clone()),
        Value::Bytes(b) => wrapper("$bytes", base64::engine::general_purpose::STANDARD.encode(b)),
        Value::Array(arr) => Json::Array(arr.iter().map(to_json).collect()),
        Value::Object(obj) => Json::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

/// Encode a Value to a JSON string
pub fn encode_json(value: &Value) -> String {
    to_json(value).to_string()
}

/// Encode a float, using the $f64 wrapper for values JSON cannot carry
fn encode_float(f: f64) -> Json {
    if f.is_nan() {
        wrapper("$f64", "NaN")
    } else if f == f64::INFINITY {
        wrapper("$f64", "+Inf")
    } else if f == f64::NEG_INFINITY {
        wrapper("$f64", "-Inf")
    } else if f.to_bits() == (-0.0_f64).to_bits() {
        wrapper("$f64", "-0.0")
    } else {
        // Finite, so from_f64 cannot fail
        Number::from_f64(f).map(Json::Number).unwrap_or(Json::Null)
    }
}

fn wrapper(key: &str, value: impl Into<String>) -> Json {
    let mut map = Map::new();
    map.insert(key.to_string(), Json::String(value.into()));
    Json::Object(map)
}

/// Convert a record to its wire object
///
/// Fields are flattened next to `id`, `version` and `updatedAt`.
pub fn record_to_json(record: &Record) -> Json {
    let mut map = Map::new();
    for (field, value) in &record.fields {
        map.insert(field.as_str().to_string(), to_json(value));
    }
    map.insert(ID_KEY.to_string(), Json::String(record.id.as_str().to_string()));
    map.insert(VERSION_KEY.to_string(), Json::Number(record.version.as_u64().into()));
    map.insert(UPDATED_AT_KEY.to_string(), Json::Number(record.updated_at.into()));
    Json::Object(map)
}

/// Encode a record to a JSON string
pub fn encode_record(record: &Record) -> String {
    record_to_json(record).to_string()
}
