//! Wire encoding for Roster
//!
//! This crate maps between JSON and the typed request, record and error
//! types of `roster-core`.
//!
//! ## Wire Encoding Rules
//!
//! | Value Type | JSON Encoding |
//! |------------|--------------|
//! | Null | `null` |
//! | Bool | `true`/`false` |
//! | Int | number |
//! | Float (normal) | number |
//! | Float (special) | `{"$f64": "..."}` |
//! | String | `"..."` |
//! | Bytes | `{"$bytes": "..."}` |
//! | Array | `[...]` |
//! | Object | `{...}` |
//!
//! ## Examples
//!
//! ```
//! use roster_wire::decode_update_request;
//! use roster_core::FieldUpdate;
//!
//! let request =
//!     decode_update_request(r#"{"id":"p1","expectedVersion":3,"draft":null}"#).unwrap();
//! assert_eq!(request.updates.get("draft"), Some(&FieldUpdate::Remove));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

// Re-export main types
pub use json::{
    conflict_details, decode_fields, decode_json, decode_update_request, encode_json, encode_record,
    envelope, from_json, record_details, record_to_json, to_json, update_request_from_object,
    DecodeError,
};
