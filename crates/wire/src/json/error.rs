//! Wire error envelope
//!
//! ```json
//! {
//!   "code": "Conflict",
//!   "message": "version conflict on p1: expected 2, actual 3",
//!   "details": {"id": "p1", "expectedVersion": 2, "actualVersion": 3}
//! }
//! ```
//!
//! `code` is one of `NotFound`, `Conflict`, `AlreadyExists`,
//! `InvalidRequest` or `Internal`. `details` is `null` unless the error
//! names a record.

use serde_json::{json, Value as Json};

/// Build an envelope from its parts
pub fn envelope(code: &str, message: &str, details: Json) -> Json {
    json!({
        "code": code,
        "message": message,
        "details": details,
    })
}

/// Details of a version conflict
pub fn conflict_details(id: &str, expected: u64, actual: u64) -> Json {
    json!({
        "id": id,
        "expectedVersion": expected,
        "actualVersion": actual,
    })
}

/// Details naming one record
pub fn record_details(table: &str, id: &str) -> Json {
    json!({
        "table": table,
        "id": id,
    })
}
