//! Main database entry point for Roster.
//!
//! This module provides the `Roster` struct, the primary entry point for
//! all database operations.

use crate::error::{Error, Result};
use crate::primitives::{Logins, Records};
use crate::types::{
    DurabilityMode, RecoveryOptions, RecoveryStats, SharedStore, TableName, TableSchema,
};
use roster_storage::{DurableStore, ShardedStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Table holding posts, the default record table
pub const POSTS_TABLE: &str = "posts";

/// The Roster database.
///
/// This is the main entry point for all database operations. Create a database
/// using [`Roster::open`], [`Roster::ephemeral`] or [`Roster::builder`].
///
/// # Example
///
/// ```
/// use roster::prelude::*;
///
/// let db = Roster::ephemeral()?;
/// let post = db.posts.create_json("p1", r#"{"title":"A"}"#)?;
/// assert_eq!(post.version.as_u64(), 1);
/// db.logins.record("alice")?;
/// db.close()?;
/// # Ok::<(), roster::Error>(())
/// ```
pub struct Roster {
    backend: Backend,
    store: SharedStore,

    /// Keeps a temporary data directory alive for the database's lifetime
    _temp_dir: Option<tempfile::TempDir>,

    /// Posts table
    pub posts: Records,

    /// Login history
    pub logins: Logins,
}

enum Backend {
    Memory(Arc<ShardedStore>),
    Durable(Arc<DurableStore>),
}

impl Roster {
    /// Open a database at the given path.
    ///
    /// Uses default settings (batched durability mode).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Create an ephemeral database with no disk I/O.
    ///
    /// No files, no WAL, no recovery. All data is lost when dropped.
    ///
    /// | Method | Disk Files | Recovery |
    /// |--------|------------|----------|
    /// | `Roster::ephemeral()` | None | No |
    /// | `Roster::builder().open_temp()` | Temp dir | Yes |
    /// | `Roster::open(path)` | User dir | Yes |
    pub fn ephemeral() -> Result<Self> {
        Self::builder().build_ephemeral()
    }

    /// Create a builder for database configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use roster::prelude::*;
    ///
    /// let db = Roster::builder().strict().open_temp()?;
    /// assert_eq!(db.durability_mode(), Some(DurabilityMode::Strict));
    /// # Ok::<(), roster::Error>(())
    /// ```
    pub fn builder() -> RosterBuilder {
        RosterBuilder::new()
    }

    /// Records of an arbitrary table, accepting any field.
    pub fn table(&self, name: &str) -> Result<Records> {
        Ok(self.table_with_schema(TableSchema::open(TableName::new(name)?)))
    }

    /// Records of the table described by `schema`.
    pub fn table_with_schema(&self, schema: TableSchema) -> Records {
        Records::new(Arc::clone(&self.store), schema)
    }

    /// Force flush pending WAL writes to disk.
    ///
    /// In batched mode, fsyncs are deferred for performance.
    /// Call `flush()` to ensure all data is persisted.
    pub fn flush(&self) -> Result<()> {
        match &self.backend {
            Backend::Memory(_) => Ok(()),
            Backend::Durable(store) => store.flush().map_err(Into::into),
        }
    }

    /// Gracefully close the database.
    ///
    /// Flushes pending writes. The WAL file is released when the last
    /// handle is dropped.
    pub fn close(&self) -> Result<()> {
        self.flush()?;
        info!(path = ?self.path(), "database closed");
        Ok(())
    }

    /// Database directory, or `None` if ephemeral.
    pub fn path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Memory(_) => None,
            Backend::Durable(store) => Some(store.dir()),
        }
    }

    /// Durability mode, or `None` if ephemeral.
    pub fn durability_mode(&self) -> Option<DurabilityMode> {
        match &self.backend {
            Backend::Memory(_) => None,
            Backend::Durable(store) => Some(store.mode()),
        }
    }

    /// Check if this is an ephemeral (no-disk) database.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self.backend, Backend::Memory(_))
    }

    /// What WAL replay found on open, or `None` if ephemeral.
    pub fn recovery_stats(&self) -> Option<RecoveryStats> {
        match &self.backend {
            Backend::Memory(_) => None,
            Backend::Durable(store) => Some(store.recovery_stats().clone()),
        }
    }

    /// Get database statistics.
    pub fn stats(&self) -> DatabaseStats {
        let (memory, wal_bytes) = match &self.backend {
            Backend::Memory(store) => (store.as_ref(), 0),
            Backend::Durable(store) => (store.memory(), store.wal_len()),
        };
        DatabaseStats {
            tables: memory.table_count(),
            records: memory.total_records(),
            wal_bytes,
        }
    }

    fn from_backend(
        backend: Backend,
        posts_schema: TableSchema,
        temp_dir: Option<tempfile::TempDir>,
    ) -> Result<Self> {
        let store: SharedStore = match &backend {
            Backend::Memory(store) => Arc::clone(store) as SharedStore,
            Backend::Durable(store) => Arc::clone(store) as SharedStore,
        };
        Ok(Self {
            posts: Records::new(Arc::clone(&store), posts_schema),
            logins: Logins::new(Arc::clone(&store))?,
            backend,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// Database statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    /// Tables holding at least one record
    pub tables: usize,
    /// Records across all tables
    pub records: usize,
    /// Bytes of valid WAL (0 if ephemeral)
    pub wal_bytes: u64,
}

/// Builder for database configuration.
///
/// # Example
///
/// ```no_run
/// use roster::prelude::*;
///
/// // Production: disk-backed with durability
/// let db = Roster::builder()
///     .path("./my-db")
///     .buffered()  // Default
///     .open()?;
///
/// // Integration testing: temp directory, no fsync
/// let db = Roster::builder()
///     .no_durability()
///     .open_temp()?;
///
/// // Unit testing: truly ephemeral (no disk at all)
/// let db = Roster::ephemeral()?;
/// # Ok::<(), roster::Error>(())
/// ```
pub struct RosterBuilder {
    path: Option<PathBuf>,
    mode: DurabilityMode,
    recovery: RecoveryOptions,
    posts_schema: Option<TableSchema>,
}

impl RosterBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            path: None,
            mode: DurabilityMode::default(),
            recovery: RecoveryOptions::default(),
            posts_schema: None,
        }
    }

    /// Set the database directory path.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use no-durability mode (WAL written, never fsynced).
    ///
    /// **Note**: Disk files are still created. For truly file-free operation,
    /// use [`Roster::ephemeral()`] instead.
    pub fn no_durability(mut self) -> Self {
        self.mode = DurabilityMode::None;
        self
    }

    /// Use buffered mode (default).
    ///
    /// Default flush interval: 100ms or 1000 writes.
    pub fn buffered(mut self) -> Self {
        self.mode = DurabilityMode::buffered_default();
        self
    }

    /// Use buffered mode with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `flush_interval_ms` - Maximum time between fsyncs
    /// * `max_pending_writes` - Maximum writes before forced fsync
    pub fn buffered_with(mut self, flush_interval_ms: u64, max_pending_writes: usize) -> Self {
        self.mode = DurabilityMode::Batched {
            interval_ms: flush_interval_ms,
            batch_size: max_pending_writes,
        };
        self
    }

    /// Use strict mode (safest, slowest).
    ///
    /// Syncs to disk on every write.
    pub fn strict(mut self) -> Self {
        self.mode = DurabilityMode::Strict;
        self
    }

    /// Set the durability mode directly.
    pub fn durability(mut self, mode: DurabilityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set WAL recovery options.
    pub fn recovery(mut self, options: RecoveryOptions) -> Self {
        self.recovery = options;
        self
    }

    /// Schema for the posts table (default: open, any field).
    pub fn posts_schema(mut self, schema: TableSchema) -> Self {
        self.posts_schema = Some(schema);
        self
    }

    /// Open the database.
    ///
    /// Uses the configured path, or a temp directory if none set.
    pub fn open(self) -> Result<Roster> {
        match self.path.clone() {
            Some(path) => self.build_durable(path, None),
            None => self.open_temp(),
        }
    }

    /// Open a temporary database.
    ///
    /// Creates a unique temporary directory, removed when the database is
    /// dropped. Useful for testing.
    pub fn open_temp(self) -> Result<Roster> {
        let temp_dir = tempfile::Builder::new().prefix("roster-").tempdir()?;
        let path = temp_dir.path().to_path_buf();
        self.build_durable(path, Some(temp_dir))
    }

    /// Open an in-memory database; path and durability settings are ignored.
    pub fn open_ephemeral(self) -> Result<Roster> {
        self.build_ephemeral()
    }

    fn posts_schema_or_default(&self) -> Result<TableSchema> {
        match &self.posts_schema {
            Some(schema) => Ok(schema.clone()),
            None => Ok(TableSchema::open(TableName::new(POSTS_TABLE)?)),
        }
    }

    fn build_ephemeral(self) -> Result<Roster> {
        let schema = self.posts_schema_or_default()?;
        Roster::from_backend(Backend::Memory(Arc::new(ShardedStore::new())), schema, None)
    }

    fn build_durable(self, path: PathBuf, temp_dir: Option<tempfile::TempDir>) -> Result<Roster> {
        let schema = self.posts_schema_or_default()?;
        let store = DurableStore::open(&path, self.mode, self.recovery)
            .map_err(|e| match Error::from(e) {
                Error::Io(io) => Error::Storage(format!("cannot open {}: {}", path.display(), io)),
                other => other,
            })?;
        Roster::from_backend(Backend::Durable(Arc::new(store)), schema, temp_dir)
    }
}

impl Default for RosterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
