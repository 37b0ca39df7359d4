//! Core types for Roster
//!
//! This crate defines the shared vocabulary of the workspace:
//! - [`Value`]: field values
//! - [`RecordId`], [`TableName`], [`FieldName`], [`Version`]: validated identifiers
//! - [`Record`]: a stored record
//! - [`UpdateRequest`] / [`FieldUpdate`]: a caller's partial update
//! - [`ConditionalUpdate`]: arguments of the atomic store primitive
//! - [`TableSchema`]: which fields a caller may touch
//! - [`AtomicConditionalStore`]: the store contract
//! - [`Error`] / [`ErrorKind`]: the error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod record;
pub mod schema;
pub mod traits;
pub mod types;
pub mod update;
pub mod value;

pub use error::{Error, ErrorKind, Result};
pub use record::Record;
pub use schema::{FieldKind, FieldSpec, TableSchema};
pub use traits::AtomicConditionalStore;
pub use types::{now_millis, FieldName, RecordId, TableName, Timestamp, Version};
pub use update::{ConditionalUpdate, FieldUpdate, UpdateRequest, UpdateRequestBuilder};
pub use value::Value;
