//! Crash recovery by WAL replay
//!
//! After recovery the in-memory state corresponds to a prefix of the
//! committed mutation history: every entry up to the first torn or corrupt
//! frame is applied, nothing after it.
//!
//! ## Recovery Sequence
//!
//! 1. Read the log and check its header
//! 2. Decode frames in order, publishing each post-image or delete
//! 3. Stop at the first torn or corrupt frame
//! 4. Report the valid length; the writer truncates the file to it

use crate::sharded::ShardedStore;
use crate::wal::{
    check_header, decode_entry, is_torn_header, Decoded, WalEntry, WAL_HEADER_SIZE,
};
use roster_core::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// Recovery options
#[derive(Debug, Clone, Default)]
pub struct RecoveryOptions {
    /// Fail instead of discarding a corrupt or torn tail
    pub fail_on_corruption: bool,
}

impl RecoveryOptions {
    /// Refuse to open a log with any damage
    pub fn strict() -> Self {
        RecoveryOptions {
            fail_on_corruption: true,
        }
    }

    /// Discard a damaged tail and keep going (default)
    pub fn permissive() -> Self {
        RecoveryOptions {
            fail_on_corruption: false,
        }
    }
}

/// Recovery result
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecoveryStats {
    /// Entries replayed into memory
    pub entries_applied: usize,
    /// Bytes after the last valid frame that were discarded
    pub discarded_bytes: u64,
    /// Length of the valid log prefix, header included
    pub valid_len: u64,
}

impl RecoveryStats {
    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "replayed {} entries, discarded {} bytes",
            self.entries_applied, self.discarded_bytes
        )
    }
}

/// Replay the log at `path` into `store`
///
/// Returns `Ok(None)` if there is no log file yet.
pub fn replay(
    path: &Path,
    store: &ShardedStore,
    options: &RecoveryOptions,
) -> Result<Option<RecoveryStats>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Ok(None);
    }
    if is_torn_header(&bytes) {
        if options.fail_on_corruption {
            return Err(Error::Storage(format!("WAL header is truncated ({} bytes)", bytes.len())));
        }
        warn!(
            path = %path.display(),
            len = bytes.len(),
            "torn WAL header, starting an empty log"
        );
        return Ok(Some(RecoveryStats {
            entries_applied: 0,
            discarded_bytes: bytes.len() as u64,
            valid_len: 0,
        }));
    }
    check_header(&bytes)?;

    let mut stats = RecoveryStats::default();
    let mut offset = WAL_HEADER_SIZE;
    while offset < bytes.len() {
        match decode_entry(&bytes[offset..]) {
            Decoded::Entry(entry, used) => {
                apply(store, entry);
                stats.entries_applied += 1;
                offset += used;
            }
            Decoded::Torn => {
                warn!(offset, "torn WAL tail");
                break;
            }
            Decoded::Corrupt(reason) => {
                warn!(offset, %reason, "corrupt WAL entry");
                break;
            }
        }
    }

    stats.valid_len = offset as u64;
    stats.discarded_bytes = (bytes.len() - offset) as u64;
    if stats.discarded_bytes > 0 && options.fail_on_corruption {
        return Err(Error::Storage(format!(
            "WAL damaged at offset {} ({} trailing bytes)",
            offset, stats.discarded_bytes
        )));
    }

    info!(path = %path.display(), "{}", stats.summary());
    Ok(Some(stats))
}

fn apply(store: &ShardedStore, entry: WalEntry) {
    match entry {
        WalEntry::Put { table, record } => store.put_raw(table, record),
        WalEntry::Delete { table, id } => store.remove_raw(&table, &id),
    }
}
