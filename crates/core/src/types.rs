//! Core identifier types
//!
//! This module defines the fundamental types used throughout the system:
//! - [`TableName`]: Name of a record table
//! - [`RecordId`]: Immutable identifier of a record within a table
//! - [`FieldName`]: Name of an updatable field (never a reserved name)
//! - [`Version`]: Optimistic concurrency token of a record
//!
//! All name types validate on construction, so a value of the type is always
//! well-formed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Maximum length of a record id in bytes
pub const MAX_RECORD_ID_LEN: usize = 1024;

/// Maximum length of a table or field name in bytes
pub const MAX_NAME_LEN: usize = 255;

/// Field names managed exclusively by the store
pub const RESERVED_FIELDS: [&str; 2] = ["id", "version"];

/// Name of a record table
///
/// ASCII alphanumerics, `_` and `-`, 1 to 255 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    /// Validate and create a table name
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_core::TableName;
    ///
    /// assert!(TableName::new("posts").is_ok());
    /// assert!(TableName::new("bad name").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(Error::invalid(format!("table name must be 1..={} bytes", MAX_NAME_LEN)));
        }
        if !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(Error::invalid(format!(
                "table name '{}' may only contain ASCII alphanumerics, '_' and '-'",
                name
            )));
        }
        Ok(TableName(name))
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Deserialization validates like `new`
impl TryFrom<String> for TableName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        TableName::new(value)
    }
}

impl From<TableName> for String {
    fn from(value: TableName) -> String {
        value.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a record within its table
///
/// Assigned at creation and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Validate and create a record id
    ///
    /// Rejects empty ids, ids over [`MAX_RECORD_ID_LEN`] bytes, and ids
    /// containing control characters.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::invalid("record id must not be empty"));
        }
        if id.len() > MAX_RECORD_ID_LEN {
            return Err(Error::invalid(format!("record id exceeds {} bytes", MAX_RECORD_ID_LEN)));
        }
        if id.chars().any(char::is_control) {
            return Err(Error::invalid("record id must not contain control characters"));
        }
        Ok(RecordId(id))
    }

    /// Borrow the id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Deserialization validates like `new`
impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        RecordId::new(value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> String {
        value.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of an updatable record field
///
/// Never equal to a reserved name (`id`, `version`), so an update built from
/// field names cannot touch the fields the store manages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    /// Validate and create a field name
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_core::FieldName;
    ///
    /// assert!(FieldName::new("title").is_ok());
    /// assert!(FieldName::new("version").is_err());
    /// assert!(FieldName::new("id").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(Error::invalid(format!("field name must be 1..={} bytes", MAX_NAME_LEN)));
        }
        if RESERVED_FIELDS.contains(&name.as_str()) {
            return Err(Error::invalid(format!(
                "field '{}' is managed by the store and cannot be updated",
                name
            )));
        }
        if name.starts_with('$') {
            return Err(Error::invalid(format!("field name '{}' must not start with '$'", name)));
        }
        if name.chars().any(char::is_control) {
            return Err(Error::invalid("field name must not contain control characters"));
        }
        Ok(FieldName(name))
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Ordering and hashing match `String`, so maps keyed by FieldName can be
// queried with a plain `&str`.
impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Deserialization validates like `new`
impl TryFrom<String> for FieldName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        FieldName::new(value)
    }
}

impl From<FieldName> for String {
    fn from(value: FieldName) -> String {
        value.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record version, the optimistic concurrency token
///
/// Starts at [`Version::INITIAL`] and advances by exactly one per successful
/// update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// Version assigned at creation
    pub const INITIAL: Version = Version(1);

    /// Wrap a raw version number
    pub const fn new(v: u64) -> Self {
        Version(v)
    }

    /// Raw version number
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Versions are positive; zero never names a stored record
    pub const fn is_valid(&self) -> bool {
        self.0 >= 1
    }

    /// The version after this one
    ///
    /// Fails instead of wrapping at `u64::MAX`.
    pub fn next(&self) -> Result<Version> {
        self.0
            .checked_add(1)
            .map(Version)
            .ok_or_else(|| Error::Internal(format!("version overflow at {}", self.0)))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Current time as a [`Timestamp`]
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}
