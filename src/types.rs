//! Public types for the Roster unified API.
//!
//! This module re-exports types from internal crates with a clean public interface.

use roster_core::AtomicConditionalStore;
use std::sync::Arc;

// Core value types
pub use roster_core::Value;

// Identifiers, versions and records
pub use roster_core::{FieldName, Record, RecordId, TableName, Timestamp, Version};

// Update requests
pub use roster_core::{FieldUpdate, UpdateRequest, UpdateRequestBuilder};

// Schemas
pub use roster_core::{FieldKind, FieldSpec, TableSchema};

// Error classification
pub use roster_core::ErrorKind;

// Storage configuration
pub use roster_storage::{DurabilityMode, RecoveryOptions, RecoveryStats};

// Login entries
pub use roster_primitives::{LoginEntry, DEFAULT_MAX_ATTEMPTS, DEFAULT_RECENT_LIMIT};

/// Store handle shared by every primitive of one database.
pub(crate) type SharedStore = Arc<dyn AtomicConditionalStore>;
