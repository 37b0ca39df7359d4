//! Error types for Roster
//!
//! The taxonomy keeps "record absent" and "version conflict" distinct because
//! callers must react differently to each: a conflict means reload and retry,
//! a missing record is a hard failure.
//!
//! Everything that originates below the store contract (I/O, encoding,
//! backend failures) collapses to [`ErrorKind::Internal`].

use crate::types::{RecordId, TableName, Version};
use thiserror::Error;

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error classification used by callers and the wire layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Target record does not exist
    NotFound,
    /// Expected version did not match the stored version
    Conflict,
    /// Record id is already taken
    AlreadyExists,
    /// Request failed validation before reaching the store
    InvalidRequest,
    /// Failure in the store or its transport
    Internal,
}

impl ErrorKind {
    /// Canonical code used in the wire error envelope
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::InvalidRequest => "InvalidRequest",
            ErrorKind::Internal => "Internal",
        }
    }
}

/// Error types for Roster operations
#[derive(Debug, Error)]
pub enum Error {
    /// Record not found
    #[error("record not found: {table}/{id}")]
    NotFound {
        /// Table that was searched
        table: TableName,
        /// Id that was not found
        id: RecordId,
    },

    /// Conditional write failed: stored version differs from the expected one
    #[error("version conflict on {id}: expected {expected}, actual {actual}")]
    Conflict {
        /// Record the write targeted
        id: RecordId,
        /// Version the caller expected
        expected: Version,
        /// Version found in the store
        actual: Version,
    },

    /// Insert of an id that already exists
    #[error("record already exists: {table}/{id}")]
    AlreadyExists {
        /// Table the insert targeted
        table: TableName,
        /// Id that is already taken
        id: RecordId,
    },

    /// Request rejected before reaching the store
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage backend error
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error (WAL, data directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error (WAL payloads)
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Error::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Error::Storage(_) | Error::Io(_) | Error::Serialization(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Check if this is a version conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this error may succeed after re-reading the record.
    ///
    /// Only conflicts qualify, and only when the retry uses a freshly read
    /// version. Resubmitting the same expected version fails forever.
    pub fn is_retryable(&self) -> bool {
        self.is_conflict()
    }

    /// Shorthand for an invalid request
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }
}
