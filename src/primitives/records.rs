//! Versioned records with optimistic partial updates.
//!
//! # Example
//!
//! ```
//! use roster::prelude::*;
//!
//! let db = Roster::ephemeral()?;
//!
//! db.posts.create_json("p1", r#"{"title":"A","draft":true}"#)?;
//!
//! // Update against the version last read
//! let post = db.posts.update_json(r#"{"id":"p1","expectedVersion":1,"title":"B","draft":null}"#)?;
//! assert_eq!(post.version.as_u64(), 2);
//!
//! // The same expected version now conflicts
//! let err = db.posts.update_json(r#"{"id":"p1","expectedVersion":1,"title":"C"}"#).unwrap_err();
//! assert!(err.is_conflict());
//! # Ok::<(), roster::Error>(())
//! ```

use crate::error::Result;
use crate::types::{
    FieldName, Record, RecordId, SharedStore, TableName, TableSchema, Value, Version,
};
use roster_core::{UpdateRequest, UpdateRequestBuilder};
use roster_primitives::{retry_update, UpdateResolver};
use std::collections::BTreeMap;

/// Operations on one table of versioned records.
///
/// Access via `db.posts`, or `db.table(..)` for any other table.
#[derive(Clone)]
pub struct Records {
    resolver: UpdateResolver<SharedStore>,
}

impl Records {
    pub(crate) fn new(store: SharedStore, schema: TableSchema) -> Self {
        Self {
            resolver: UpdateResolver::new(store, schema),
        }
    }

    /// Table name.
    pub fn table(&self) -> &TableName {
        self.resolver.table()
    }

    /// Schema updates are validated against.
    pub fn schema(&self) -> &TableSchema {
        self.resolver.schema()
    }

    /// Create a record at version 1.
    pub fn create(&self, id: &str, fields: BTreeMap<FieldName, Value>) -> Result<Record> {
        Ok(self.resolver.create(RecordId::new(id)?, fields)?)
    }

    /// Create a record from a JSON object of initial fields.
    pub fn create_json(&self, id: &str, fields: &str) -> Result<Record> {
        let fields = roster_wire::decode_fields(fields)?;
        self.create(id, fields)
    }

    /// Get a record.
    ///
    /// Returns `None` if it doesn't exist.
    pub fn get(&self, id: &str) -> Result<Option<Record>> {
        Ok(self.resolver.get(&RecordId::new(id)?)?)
    }

    /// Apply a partial update guarded by the request's expected version.
    pub fn update(&self, request: UpdateRequest) -> Result<Record> {
        Ok(self.resolver.apply(request)?)
    }

    /// Apply a partial update given as a JSON request.
    ///
    /// `{"id": "p1", "expectedVersion": 3, "title": "B", "draft": null}`
    pub fn update_json(&self, request: &str) -> Result<Record> {
        let request = roster_wire::decode_update_request(request)?;
        self.update(request)
    }

    /// Read-modify-write with retry on conflict.
    ///
    /// `build` may run more than once and must depend only on the record it
    /// is given.
    pub fn update_with_retry<F>(&self, id: &str, max_attempts: usize, build: F) -> Result<Record>
    where
        F: FnMut(&Record, UpdateRequestBuilder) -> UpdateRequestBuilder,
    {
        Ok(retry_update(
            &self.resolver,
            &RecordId::new(id)?,
            max_attempts,
            build,
        )?)
    }

    /// Delete a record, only if it is at `expected` when one is given.
    ///
    /// Returns `true` if the record existed.
    pub fn delete(&self, id: &str, expected: Option<u64>) -> Result<bool> {
        Ok(self
            .resolver
            .delete(&RecordId::new(id)?, expected.map(Version::new))?)
    }

    /// All records, ordered by id.
    pub fn list(&self) -> Result<Vec<Record>> {
        Ok(self.resolver.list()?)
    }
}
