//! JSON wire encoding for Roster
//!
//! Special wrappers are used for values JSON cannot carry natively:
//!
//! - `{"$bytes": "<base64>"}` for binary data
//! - `{"$f64": "NaN|+Inf|-Inf|-0.0"}` for special floats

mod decode;
mod encode;
mod error;
mod request;

pub use decode::{decode_json, from_json, DecodeError};
pub use encode::{
    encode_json, encode_record, record_to_json, to_json, ID_KEY, UPDATED_AT_KEY, VERSION_KEY,
};
pub use error::{conflict_details, envelope, record_details};
pub use request::{
    decode_fields, decode_update_request, update_request_from_object, EXPECTED_VERSION_KEY,
};
