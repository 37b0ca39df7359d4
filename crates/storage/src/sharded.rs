//! Sharded in-memory record store
//!
//! DashMap keyed by table, FxHashMap within each table.
//!
//! # Design
//!
//! - DashMap: sharded by table name, concurrent reads
//! - FxHashMap: O(1) lookups by record id
//! - Per-table: writes to different tables never contend
//!
//! # Atomicity
//!
//! Every mutation runs while holding the write guard of the table's DashMap
//! shard. The version compare, the commit hook, and the publish of the new
//! record all happen under that one guard, so a concurrent writer to the same
//! record observes either the state before or the state after, never a mix.

use dashmap::DashMap;
use roster_core::{
    AtomicConditionalStore, ConditionalUpdate, Error, Record, RecordId, Result, TableName,
    Version,
};
use rustc_hash::FxHashMap;

/// Records of one table
#[derive(Debug, Default)]
pub struct Shard {
    pub(crate) data: FxHashMap<RecordId, Record>,
}

impl Shard {
    /// Create a new empty shard
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in this shard
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if shard is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Sharded in-memory store
///
/// Implements [`AtomicConditionalStore`] with no persistence. The
/// `*_with` methods take a commit hook that runs under the write guard after
/// the new state is computed and before it becomes visible; a hook error
/// aborts the mutation. [`DurableStore`](crate::DurableStore) uses the hook
/// to append to its write-ahead log.
///
/// # Example
///
/// ```
/// use roster_core::{AtomicConditionalStore, Record, RecordId, TableName};
/// use roster_storage::ShardedStore;
/// use std::collections::BTreeMap;
///
/// let store = ShardedStore::new();
/// let posts = TableName::new("posts").unwrap();
/// let record = Record::new(RecordId::new("p1").unwrap(), BTreeMap::new());
/// store.insert(&posts, record).unwrap();
/// assert_eq!(store.total_records(), 1);
/// ```
#[derive(Default)]
pub struct ShardedStore {
    shards: DashMap<TableName, Shard>,
}

impl ShardedStore {
    /// Create new sharded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with expected number of tables
    pub fn with_capacity(num_tables: usize) -> Self {
        Self {
            shards: DashMap::with_capacity(num_tables),
        }
    }

    /// Number of tables holding at least one record
    pub fn table_count(&self) -> usize {
        self.shards.iter().filter(|s| !s.value().is_empty()).count()
    }

    /// Total number of records across all tables
    pub fn total_records(&self) -> usize {
        self.shards.iter().map(|entry| entry.value().len()).sum()
    }

    /// Number of records in one table
    pub fn table_len(&self, table: &TableName) -> usize {
        self.shards.get(table).map(|s| s.len()).unwrap_or(0)
    }

    /// Insert, running `commit` on the new record before publishing it
    pub fn insert_with<F>(&self, table: &TableName, record: Record, commit: F) -> Result<Record>
    where
        F: FnOnce(&Record) -> Result<()>,
    {
        let mut shard = self.shards.entry(table.clone()).or_default();
        if shard.data.contains_key(&record.id) {
            return Err(Error::AlreadyExists {
                table: table.clone(),
                id: record.id,
            });
        }
        commit(&record)?;
        shard.data.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// Conditional update, running `commit` on the post-image before publishing it
    pub fn update_with<F>(&self, update: &ConditionalUpdate, commit: F) -> Result<Record>
    where
        F: FnOnce(&Record) -> Result<()>,
    {
        let mut shard = self
            .shards
            .get_mut(&update.table)
            .ok_or_else(|| update.not_found())?;
        let current = shard
            .data
            .get(&update.id)
            .ok_or_else(|| update.not_found())?;

        let next = update.apply_to(current)?;
        commit(&next)?;
        shard.data.insert(next.id.clone(), next.clone());
        Ok(next)
    }

    /// Delete, running `commit` before removing the record
    pub fn delete_with<F>(
        &self,
        table: &TableName,
        id: &RecordId,
        expected: Option<Version>,
        commit: F,
    ) -> Result<bool>
    where
        F: FnOnce() -> Result<()>,
    {
        let Some(mut shard) = self.shards.get_mut(table) else {
            return Ok(false);
        };
        let Some(current) = shard.data.get(id) else {
            return Ok(false);
        };
        if let Some(expected) = expected {
            if current.version != expected {
                return Err(Error::Conflict {
                    id: id.clone(),
                    expected,
                    actual: current.version,
                });
            }
        }
        commit()?;
        shard.data.remove(id);
        Ok(true)
    }

    /// Publish a record unconditionally (WAL replay)
    pub(crate) fn put_raw(&self, table: TableName, record: Record) {
        self.shards
            .entry(table)
            .or_default()
            .data
            .insert(record.id.clone(), record);
    }

    /// Remove a record unconditionally (WAL replay)
    pub(crate) fn remove_raw(&self, table: &TableName, id: &RecordId) {
        if let Some(mut shard) = self.shards.get_mut(table) {
            shard.data.remove(id);
        }
    }
}

impl AtomicConditionalStore for ShardedStore {
    fn insert(&self, table: &TableName, record: Record) -> Result<Record> {
        self.insert_with(table, record, |_| Ok(()))
    }

    fn get(&self, table: &TableName, id: &RecordId) -> Result<Option<Record>> {
        Ok(self
            .shards
            .get(table)
            .and_then(|shard| shard.data.get(id).cloned()))
    }

    fn conditional_update(&self, update: &ConditionalUpdate) -> Result<Record> {
        self.update_with(update, |_| Ok(()))
    }

    fn delete(&self, table: &TableName, id: &RecordId, expected: Option<Version>) -> Result<bool> {
        self.delete_with(table, id, expected, || Ok(()))
    }

    fn scan(&self, table: &TableName) -> Result<Vec<Record>> {
        Ok(self
            .shards
            .get(table)
            .map(|shard| shard.data.values().cloned().collect())
            .unwrap_or_default())
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("table_count", &self.table_count())
            .field("total_records", &self.total_records())
            .finish()
    }
}
