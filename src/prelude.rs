//! Convenient imports for Roster.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```
//! use roster::prelude::*;
//!
//! let db = Roster::ephemeral()?;
//! db.posts.create_json("p1", r#"{"title":"A"}"#)?;
//! # Ok::<(), roster::Error>(())
//! ```

// Main entry point
pub use crate::database::{Roster, RosterBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Primitives
pub use crate::primitives::{Logins, Records};

// Core types
pub use crate::types::{
    FieldName, FieldUpdate, LoginEntry, Record, RecordId, TableName, UpdateRequest,
    UpdateRequestBuilder, Value, Version,
};

// Schemas
pub use crate::types::{FieldKind, FieldSpec, TableSchema};

// Storage configuration
pub use crate::types::{DurabilityMode, RecoveryOptions};
