//! Write-ahead log
//!
//! The WAL records every committed mutation as the post-image of the record,
//! so replay is idempotent and needs no version arithmetic.
//!
//! ## File Format
//!
//! ```text
//! +------------+-----------+
//! | magic (4)  | format (4)|   file header, "RWAL" + u32 LE
//! +------------+-----------+
//! | len (4)    | crc32 (4) | payload (len bytes, bincode WalEntry) |
//! | len (4)    | crc32 (4) | payload ...                           |
//! ```
//!
//! The checksum covers the payload only. An entry is valid only if the full
//! frame is present, the length is within [`MAX_ENTRY_SIZE`], the checksum
//! matches, and the payload decodes.

use crate::durability::DurabilityMode;
use roster_core::{Error, Record, RecordId, Result, TableName};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// File name of the log inside a data directory
pub const WAL_FILE_NAME: &str = "roster.wal";

/// Magic bytes at the start of every WAL file
pub const WAL_MAGIC: [u8; 4] = *b"RWAL";

/// Current WAL format version
pub const WAL_FORMAT_VERSION: u32 = 1;

/// Size of the file header
pub const WAL_HEADER_SIZE: usize = 8;

/// Size of a frame header (length + checksum)
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest payload accepted on replay; anything bigger is treated as corruption
pub const MAX_ENTRY_SIZE: usize = 64 * 1024 * 1024;

/// WAL entry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalEntry {
    /// Record inserted or updated; carries the full post-image
    Put {
        /// Table holding the record
        table: TableName,
        /// Record as published
        record: Record,
    },

    /// Record deleted
    Delete {
        /// Table holding the record
        table: TableName,
        /// Deleted record id
        id: RecordId,
    },
}

impl WalEntry {
    /// Table this entry belongs to
    pub fn table(&self) -> &TableName {
        match self {
            WalEntry::Put { table, .. } | WalEntry::Delete { table, .. } => table,
        }
    }
}

/// Encode one entry as a frame
pub fn encode_entry(entry: &WalEntry) -> Result<Vec<u8>> {
    let payload = bincode::serialize(entry).map_err(|e| Error::Serialization(e.to_string()))?;
    if payload.len() > MAX_ENTRY_SIZE {
        return Err(Error::invalid(format!(
            "WAL entry of {} bytes exceeds limit of {}",
            payload.len(),
            MAX_ENTRY_SIZE
        )));
    }
    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Outcome of decoding one frame
#[derive(Debug)]
pub enum Decoded {
    /// A valid entry and the number of bytes it occupied
    Entry(WalEntry, usize),
    /// Not enough bytes for a whole frame
    Torn,
    /// Frame present but invalid
    Corrupt(String),
}

/// Decode the frame at the start of `buf`
pub fn decode_entry(buf: &[u8]) -> Decoded {
    if buf.len() < FRAME_HEADER_SIZE {
        return Decoded::Torn;
    }
    let len = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    let crc = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    if len > MAX_ENTRY_SIZE {
        return Decoded::Corrupt(format!("entry length {} exceeds limit", len));
    }
    let end = FRAME_HEADER_SIZE + len;
    if buf.len() < end {
        return Decoded::Torn;
    }
    let payload = &buf[FRAME_HEADER_SIZE..end];
    if crc32fast::hash(payload) != crc {
        return Decoded::Corrupt("checksum mismatch".to_string());
    }
    match bincode::deserialize(payload) {
        Ok(entry) => Decoded::Entry(entry, end),
        Err(e) => Decoded::Corrupt(format!("undecodable payload: {}", e)),
    }
}

fn header_bytes() -> [u8; WAL_HEADER_SIZE] {
    let mut header = [0u8; WAL_HEADER_SIZE];
    header[..4].copy_from_slice(&WAL_MAGIC);
    header[4..].copy_from_slice(&WAL_FORMAT_VERSION.to_le_bytes());
    header
}

/// Check whether `buf` is a strict prefix of the header
///
/// Left behind by a crash between creating the file and writing its header.
pub fn is_torn_header(buf: &[u8]) -> bool {
    buf.len() < WAL_HEADER_SIZE && header_bytes().starts_with(buf)
}

/// Check the file header; an empty buffer is a fresh log
pub fn check_header(buf: &[u8]) -> Result<()> {
    if buf.len() < WAL_HEADER_SIZE {
        return Err(Error::Storage("WAL file header is truncated".to_string()));
    }
    if buf[..4] != WAL_MAGIC {
        return Err(Error::Storage("not a roster WAL file (bad magic)".to_string()));
    }
    let format = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    if format != WAL_FORMAT_VERSION {
        return Err(Error::Storage(format!(
            "unsupported WAL format version {} (expected {})",
            format, WAL_FORMAT_VERSION
        )));
    }
    Ok(())
}

/// Append-only WAL writer
///
/// Not internally synchronized; [`DurableStore`](crate::DurableStore) keeps it
/// behind a mutex.
#[derive(Debug)]
pub struct Wal {
    file: File,
    path: PathBuf,
    mode: DurabilityMode,
    /// End of the last complete frame
    offset: u64,
    pending: usize,
    last_sync: Instant,
}

impl Wal {
    /// Open or create the log at `path`, positioned after its last valid frame
    ///
    /// `valid_len` is the length established by replay; the file is truncated
    /// to it. Pass `None` for a log that has not been replayed (it must then
    /// be empty or header-only).
    pub fn open(
        path: impl AsRef<Path>,
        mode: DurabilityMode,
        valid_len: Option<u64>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let file_len = file.metadata()?.len();
        let offset = if file_len < WAL_HEADER_SIZE as u64 {
            if file_len > 0 {
                let mut partial = Vec::new();
                file.read_to_end(&mut partial)?;
                if !is_torn_header(&partial) {
                    check_header(&partial)?;
                }
                file.set_len(0)?;
                file.seek(SeekFrom::Start(0))?;
            }
            file.write_all(&header_bytes())?;
            file.sync_all()?;
            WAL_HEADER_SIZE as u64
        } else {
            let mut header = [0u8; WAL_HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            let read = file.read(&mut header)?;
            check_header(&header[..read])?;
            match valid_len {
                Some(len) => len,
                None if file_len == WAL_HEADER_SIZE as u64 => file_len,
                None => {
                    return Err(Error::Storage(
                        "WAL has entries but was opened without replay".to_string(),
                    ));
                }
            }
        };
        if file_len > offset {
            // Drop a torn or corrupt tail so new frames follow the last good one
            file.set_len(offset)?;
            file.sync_all()?;
        }
        file.seek(SeekFrom::Start(offset))?;

        debug!(path = %path.display(), offset, ?mode, "WAL opened");
        Ok(Self {
            file,
            path,
            mode,
            offset,
            pending: 0,
            last_sync: Instant::now(),
        })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes of valid log, header included
    pub fn len(&self) -> u64 {
        self.offset
    }

    /// Check if the log holds no entries
    pub fn is_empty(&self) -> bool {
        self.offset <= WAL_HEADER_SIZE as u64
    }

    /// Durability mode of this writer
    pub fn mode(&self) -> DurabilityMode {
        self.mode
    }

    /// Append one entry, fsyncing according to the durability mode
    ///
    /// On failure the file is cut back to the previous frame boundary so a
    /// partial frame never precedes a later good one.
    pub fn append(&mut self, entry: &WalEntry) -> Result<()> {
        let frame = encode_entry(entry)?;
        if let Err(e) = self.file.write_all(&frame) {
            self.rewind();
            return Err(e.into());
        }
        self.offset += frame.len() as u64;
        self.pending += 1;

        if self.sync_due() {
            if let Err(e) = self.sync() {
                // The frame is written but not known durable; do not publish it
                self.offset -= frame.len() as u64;
                self.rewind();
                return Err(e);
            }
        }
        Ok(())
    }

    fn sync_due(&self) -> bool {
        match self.mode {
            DurabilityMode::None => false,
            DurabilityMode::Strict => true,
            DurabilityMode::Batched {
                interval_ms,
                batch_size,
            } => {
                self.pending >= batch_size
                    || self.last_sync.elapsed() >= Duration::from_millis(interval_ms)
            }
        }
    }

    fn rewind(&mut self) {
        let offset = self.offset;
        let result = self
            .file
            .set_len(offset)
            .and_then(|_| self.file.seek(SeekFrom::Start(offset)).map(|_| ()));
        if let Err(e) = result {
            error!(
                path = %self.path.display(),
                offset,
                error = %e,
                "failed to rewind WAL after write error"
            );
        }
    }

    /// Force pending appends to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        self.pending = 0;
        self.last_sync = Instant::now();
        Ok(())
    }
}
