//! Update request decoding
//!
//! ```json
//! {"id": "p1", "expectedVersion": 3, "title": "B", "draft": null}
//! ```
//!
//! `id` and `expectedVersion` are control keys; every other key is a field
//! instruction. JSON `null` removes the field, any other value sets it.

use super::decode::{from_json, json_type, parse, DecodeError};
use super::encode::{ID_KEY, VERSION_KEY};
use roster_core::{FieldName, FieldUpdate, RecordId, UpdateRequest, Value, Version};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Request key carrying the version the caller last read
pub const EXPECTED_VERSION_KEY: &str = "expectedVersion";

/// Decode an update request from JSON text
pub fn decode_update_request(json: &str) -> Result<UpdateRequest, DecodeError> {
    match parse(json)? {
        Json::Object(obj) => update_request_from_object(obj),
        other => Err(DecodeError::NotAnObject(json_type(&other))),
    }
}

/// Decode an update request from a parsed JSON object
pub fn update_request_from_object(
    mut obj: Map<String, Json>,
) -> Result<UpdateRequest, DecodeError> {
    let id = match obj.remove(ID_KEY) {
        Some(Json::String(s)) => {
            RecordId::new(s).map_err(|e| DecodeError::InvalidId(e.to_string()))?
        }
        Some(other) => {
            return Err(DecodeError::InvalidId(format!(
                "expected string, got {}",
                json_type(&other)
            )))
        }
        None => return Err(DecodeError::MissingKey(ID_KEY)),
    };

    let expected_version = match obj.remove(EXPECTED_VERSION_KEY) {
        Some(Json::Number(n)) => match n.as_u64() {
            Some(v) if v >= Version::INITIAL.as_u64() => Version::new(v),
            _ => return Err(DecodeError::InvalidVersion(n.to_string())),
        },
        Some(other) => return Err(DecodeError::InvalidVersion(json_type(&other).to_string())),
        None => return Err(DecodeError::MissingKey(EXPECTED_VERSION_KEY)),
    };

    let mut request = UpdateRequest::new(id, expected_version);
    for (key, value) in obj {
        let field = field_name(key)?;
        let update = FieldUpdate::from_nullable(Some(from_json(value)?));
        request = request.with_update(field, update);
    }
    Ok(request)
}

/// Decode the initial fields of a new record from a JSON object
///
/// `null` values are dropped: there is nothing to remove on create.
pub fn decode_fields(json: &str) -> Result<BTreeMap<FieldName, Value>, DecodeError> {
    let obj = match parse(json)? {
        Json::Object(obj) => obj,
        other => return Err(DecodeError::NotAnObject(json_type(&other))),
    };
    let mut fields = BTreeMap::new();
    for (key, value) in obj {
        let field = field_name(key)?;
        if !value.is_null() {
            fields.insert(field, from_json(value)?);
        }
    }
    Ok(fields)
}

fn field_name(key: String) -> Result<FieldName, DecodeError> {
    if key == ID_KEY || key == VERSION_KEY {
        return Err(DecodeError::ReservedField(key));
    }
    FieldName::new(key).map_err(|e| DecodeError::InvalidField(e.to_string()))
}
