//! Unified error types for Roster.
//!
//! This module provides a clean error type that wraps internal errors
//! and presents a consistent interface to users.

use roster_core::ErrorKind;
use serde_json::Value as Json;
use thiserror::Error;

/// All Roster errors.
///
/// This is the canonical error type for all Roster operations.
/// It provides a clean, stable interface that hides internal error details.
#[derive(Debug, Error)]
pub enum Error {
    /// Record not found
    #[error("not found: {table}/{id}")]
    NotFound {
        /// Table searched
        table: String,
        /// Missing id
        id: String,
    },

    /// Version conflict: the record changed since the caller read it
    #[error("conflict on {id}: expected version {expected}, actual {actual}")]
    Conflict {
        /// Record the write targeted
        id: String,
        /// Version the caller expected
        expected: u64,
        /// Version found in the store
        actual: u64,
    },

    /// Record id already taken
    #[error("already exists: {table}/{id}")]
    AlreadyExists {
        /// Table written
        table: String,
        /// Taken id
        id: String,
    },

    /// Malformed or disallowed request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Roster operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Coarse classification, as used in the wire envelope.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::Io(_) | Error::Serialization(_) | Error::Storage(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Check if this error is retryable.
    ///
    /// Retryable errors (conflicts) may succeed on retry with fresh data.
    pub fn is_retryable(&self) -> bool {
        self.is_conflict()
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }

    /// Wire error envelope: `{"code", "message", "details"}`.
    pub fn to_json(&self) -> Json {
        let details = match self {
            Error::NotFound { table, id } | Error::AlreadyExists { table, id } => {
                roster_wire::record_details(table, id)
            }
            Error::Conflict {
                id,
                expected,
                actual,
            } => roster_wire::conflict_details(id, *expected, *actual),
            _ => Json::Null,
        };
        roster_wire::envelope(self.kind().code(), &self.to_string(), details)
    }
}

// Convert from internal core errors
impl From<roster_core::Error> for Error {
    fn from(e: roster_core::Error) -> Self {
        use roster_core::Error as CoreError;
        match e {
            CoreError::NotFound { table, id } => Error::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            },
            CoreError::Conflict {
                id,
                expected,
                actual,
            } => Error::Conflict {
                id: id.to_string(),
                expected: expected.as_u64(),
                actual: actual.as_u64(),
            },
            CoreError::AlreadyExists { table, id } => Error::AlreadyExists {
                table: table.to_string(),
                id: id.to_string(),
            },
            CoreError::InvalidRequest(msg) => Error::InvalidRequest(msg),
            CoreError::Storage(msg) => Error::Storage(msg),
            CoreError::Io(io_err) => Error::Io(io_err),
            CoreError::Serialization(msg) => Error::Serialization(msg),
            CoreError::Internal(msg) => Error::Internal(msg),
        }
    }
}

impl From<roster_wire::DecodeError> for Error {
    fn from(e: roster_wire::DecodeError) -> Self {
        Error::InvalidRequest(e.to_string())
    }
}
