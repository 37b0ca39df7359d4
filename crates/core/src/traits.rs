//! Store contract
//!
//! [`AtomicConditionalStore`] is the boundary between the resolver and
//! whatever actually holds records. Implementations must evaluate the version
//! condition and apply the mutation as one atomic step: no other writer may
//! interleave between the compare and the write.

use crate::error::Result;
use crate::record::Record;
use crate::types::{RecordId, TableName, Version};
use crate::update::ConditionalUpdate;

/// A record store with an atomic compare-version-then-write primitive
///
/// # Contract
///
/// - `conditional_update` either applies every instruction and increments
///   the version by exactly one, or changes nothing.
/// - It fails with `Error::NotFound` if the record is absent and with
///   `Error::Conflict` if the stored version differs from the expected one.
/// - Backend failures surface as `Storage`, `Io`, `Serialization` or
///   `Internal` errors and also leave the record unchanged.
///
/// Implementations must be safe to share across threads.
pub trait AtomicConditionalStore: Send + Sync {
    /// Insert a new record; fails with `AlreadyExists` if the id is taken
    fn insert(&self, table: &TableName, record: Record) -> Result<Record>;

    /// Read a record
    fn get(&self, table: &TableName, id: &RecordId) -> Result<Option<Record>>;

    /// Atomically check the version and apply a partial update
    fn conditional_update(&self, update: &ConditionalUpdate) -> Result<Record>;

    /// Delete a record, optionally only at an expected version
    ///
    /// Returns `false` if the record did not exist. A version mismatch fails
    /// with `Conflict` and deletes nothing.
    fn delete(&self, table: &TableName, id: &RecordId, expected: Option<Version>) -> Result<bool>;

    /// Snapshot every record of a table, in no particular order
    fn scan(&self, table: &TableName) -> Result<Vec<Record>>;
}

impl<S: AtomicConditionalStore + ?Sized> AtomicConditionalStore for std::sync::Arc<S> {
    fn insert(&self, table: &TableName, record: Record) -> Result<Record> {
        (**self).insert(table, record)
    }

    fn get(&self, table: &TableName, id: &RecordId) -> Result<Option<Record>> {
        (**self).get(table, id)
    }

    fn conditional_update(&self, update: &ConditionalUpdate) -> Result<Record> {
        (**self).conditional_update(update)
    }

    fn delete(&self, table: &TableName, id: &RecordId, expected: Option<Version>) -> Result<bool> {
        (**self).delete(table, id, expected)
    }

    fn scan(&self, table: &TableName) -> Result<Vec<Record>> {
        (**self).scan(table)
    }
}
