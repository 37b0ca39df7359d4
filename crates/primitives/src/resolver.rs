//! UpdateResolver: conditional partial updates
//!
//! ## Design: STATELESS FACADE
//!
//! The resolver holds a store handle and a table schema. It keeps no state
//! between calls and never retries: a version conflict is reported to the
//! caller, who decides whether to reload and try again (see
//! [`retry_update`](crate::retry_update)).
//!
//! ## Apply
//!
//! 1. Reject `expectedVersion < 1`
//! 2. Validate every field instruction against the schema
//! 3. Hand one [`ConditionalUpdate`] to the store
//!
//! Steps 1 and 2 never touch the store. Step 3 is the store's single atomic
//! compare-and-apply; on conflict or not-found nothing changes.
//!
//! ## Thread Safety
//!
//! `UpdateResolver` is `Send + Sync` when its store is. Calls on different
//! ids are independent; calls racing on the same id and expected version
//! have exactly one winner.

use roster_core::{
    AtomicConditionalStore, Error, FieldName, Record, RecordId, Result, TableName, TableSchema,
    UpdateRequest, Value, Version,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Applies version-guarded partial updates to one table
///
/// # Example
///
/// ```
/// use roster_core::{RecordId, TableName, TableSchema, UpdateRequest};
/// use roster_primitives::UpdateResolver;
/// use roster_storage::ShardedStore;
/// use std::collections::BTreeMap;
///
/// let schema = TableSchema::open(TableName::new("posts").unwrap());
/// let posts = UpdateResolver::new(ShardedStore::new(), schema);
/// posts.create(RecordId::new("p1").unwrap(), BTreeMap::new()).unwrap();
///
/// let request = UpdateRequest::builder("p1", 1).set("title", "A").build().unwrap();
/// let updated = posts.apply(request).unwrap();
/// assert_eq!(updated.version.as_u64(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UpdateResolver<S> {
    store: S,
    schema: TableSchema,
}

impl<S: AtomicConditionalStore> UpdateResolver<S> {
    /// Create a resolver for the table described by `schema`
    pub fn new(store: S, schema: TableSchema) -> Self {
        Self { store, schema }
    }

    /// Table this resolver writes to
    pub fn table(&self) -> &TableName {
        self.schema.name()
    }

    /// Schema requests are validated against
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply a partial update if the record is still at `expected_version`
    ///
    /// On success returns the record after the update, at
    /// `expected_version + 1`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest`: bad expected version or a field the schema rejects;
    ///   the store is not called
    /// - `NotFound`: no record with this id
    /// - `Conflict`: the stored version differs; nothing was written
    /// - anything else: store failure, passed through unchanged
    pub fn apply(&self, request: UpdateRequest) -> Result<Record> {
        if !request.expected_version.is_valid() {
            return Err(Error::invalid("expectedVersion must be a positive integer"));
        }
        self.schema.validate(&request)?;

        let id = request.id.clone();
        let expected = request.expected_version;
        let field_count = request.updates.len();
        let update = request.into_conditional(self.table().clone());

        match self.store.conditional_update(&update) {
            Ok(record) => {
                debug!(
                    table = %self.table(),
                    %id,
                    version = record.version.as_u64(),
                    fields = field_count,
                    "update applied"
                );
                Ok(record)
            }
            Err(e) => {
                self.log_failure(&id, expected, &e);
                Err(e)
            }
        }
    }

    fn log_failure(&self, id: &RecordId, expected: Version, error: &Error) {
        match error {
            Error::Conflict { actual, .. } => debug!(
                table = %self.table(),
                %id,
                expected = expected.as_u64(),
                actual = actual.as_u64(),
                "update rejected: version conflict"
            ),
            Error::NotFound { .. } => {
                debug!(table = %self.table(), %id, "update rejected: not found")
            }
            other => warn!(table = %self.table(), %id, error = %other, "update failed"),
        }
    }

    /// Create a record at version 1
    ///
    /// `Null` values are dropped. Fails with `AlreadyExists` if the id is taken.
    pub fn create(&self, id: RecordId, fields: BTreeMap<FieldName, Value>) -> Result<Record> {
        let fields: BTreeMap<_, _> = fields.into_iter().filter(|(_, v)| !v.is_null()).collect();
        self.schema.validate_new(&fields)?;

        let record = self.store.insert(self.table(), Record::new(id, fields))?;
        debug!(table = %self.table(), id = %record.id, "record created");
        Ok(record)
    }

    /// Read a record
    pub fn get(&self, id: &RecordId) -> Result<Option<Record>> {
        self.store.get(self.table(), id)
    }

    /// Read a record that must exist
    pub fn get_existing(&self, id: &RecordId) -> Result<Record> {
        self.get(id)?.ok_or_else(|| Error::NotFound {
            table: self.table().clone(),
            id: id.clone(),
        })
    }

    /// Delete a record, optionally only if it is at `expected`
    ///
    /// Returns whether a record was removed.
    pub fn delete(&self, id: &RecordId, expected: Option<Version>) -> Result<bool> {
        if let Some(v) = expected {
            if !v.is_valid() {
                return Err(Error::invalid("expectedVersion must be a positive integer"));
            }
        }
        let removed = self.store.delete(self.table(), id, expected)?;
        debug!(table = %self.table(), %id, removed, "delete");
        Ok(removed)
    }

    /// Every record in the table, ordered by id
    pub fn list(&self) -> Result<Vec<Record>> {
        let mut records = self.store.scan(self.table())?;
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }
}
