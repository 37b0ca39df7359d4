//! WAL-backed store
//!
//! [`DurableStore`] wraps a [`ShardedStore`] and appends every mutation to the
//! write-ahead log from inside the shard's commit hook. The append therefore
//! happens after the version check and before the new record is visible:
//! a failed append leaves memory untouched, and a rejected update writes
//! nothing to the log.
//!
//! Lock order is always shard guard, then WAL mutex.

use crate::durability::DurabilityMode;
use crate::recovery::{replay, RecoveryOptions, RecoveryStats};
use crate::sharded::ShardedStore;
use crate::wal::{Wal, WalEntry, WAL_FILE_NAME};
use parking_lot::Mutex;
use roster_core::{
    AtomicConditionalStore, ConditionalUpdate, Record, RecordId, Result, TableName, Version,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Store whose mutations survive a restart
pub struct DurableStore {
    memory: ShardedStore,
    wal: Mutex<Wal>,
    dir: PathBuf,
    recovery: RecoveryStats,
}

impl DurableStore {
    /// Open the store in `dir`, replaying any existing log
    ///
    /// The directory is created if missing. A damaged log tail is discarded
    /// (and truncated from the file) unless `options.fail_on_corruption` is set.
    pub fn open(
        dir: impl AsRef<Path>,
        mode: DurabilityMode,
        options: RecoveryOptions,
    ) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(WAL_FILE_NAME);

        let memory = ShardedStore::new();
        let recovery = replay(&path, &memory, &options)?.unwrap_or_default();
        let valid_len = (recovery.valid_len > 0).then_some(recovery.valid_len);
        let wal = Wal::open(&path, mode, valid_len)?;

        info!(
            dir = %dir.display(),
            mode = mode.description(),
            records = memory.total_records(),
            "store opened"
        );
        Ok(Self {
            memory,
            wal: Mutex::new(wal),
            dir,
            recovery,
        })
    }

    /// Data directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file
    pub fn wal_path(&self) -> PathBuf {
        self.dir.join(WAL_FILE_NAME)
    }

    /// Durability mode of the log
    pub fn mode(&self) -> DurabilityMode {
        self.wal.lock().mode()
    }

    /// What replay found when the store was opened
    pub fn recovery_stats(&self) -> &RecoveryStats {
        &self.recovery
    }

    /// Bytes of valid log
    pub fn wal_len(&self) -> u64 {
        self.wal.lock().len()
    }

    /// In-memory view
    pub fn memory(&self) -> &ShardedStore {
        &self.memory
    }

    /// Force buffered log writes to disk
    pub fn flush(&self) -> Result<()> {
        self.wal.lock().sync()
    }

    fn log(&self, entry: &WalEntry) -> Result<()> {
        self.wal.lock().append(entry)
    }
}

impl AtomicConditionalStore for DurableStore {
    fn insert(&self, table: &TableName, record: Record) -> Result<Record> {
        self.memory.insert_with(table, record, |record| {
            self.log(&WalEntry::Put {
                table: table.clone(),
                record: record.clone(),
            })
        })
    }

    fn get(&self, table: &TableName, id: &RecordId) -> Result<Option<Record>> {
        self.memory.get(table, id)
    }

    fn conditional_update(&self, update: &ConditionalUpdate) -> Result<Record> {
        self.memory.update_with(update, |next| {
            self.log(&WalEntry::Put {
                table: update.table.clone(),
                record: next.clone(),
            })
        })
    }

    fn delete(&self, table: &TableName, id: &RecordId, expected: Option<Version>) -> Result<bool> {
        self.memory.delete_with(table, id, expected, || {
            self.log(&WalEntry::Delete {
                table: table.clone(),
                id: id.clone(),
            })
        })
    }

    fn scan(&self, table: &TableName) -> Result<Vec<Record>> {
        self.memory.scan(table)
    }
}

impl Drop for DurableStore {
    fn drop(&mut self) {
        if let Err(e) = self.wal.get_mut().sync() {
            debug!(error = %e, "final WAL sync failed");
        }
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("dir", &self.dir)
            .field("memory", &self.memory)
            .finish()
    }
}
