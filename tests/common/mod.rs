//! Shared helpers for Roster integration tests.

#![allow(dead_code)]

use roster::prelude::*;
use std::path::{Path, PathBuf};

/// Ephemeral database, no disk I/O
pub fn ephemeral_db() -> Roster {
    Roster::ephemeral().expect("Failed to create ephemeral database")
}

/// Durable database in `dir`
pub fn durable_db(dir: &Path, mode: DurabilityMode) -> Roster {
    Roster::builder()
        .path(dir)
        .durability(mode)
        .open()
        .expect("Failed to open durable database")
}

/// WAL file of a durable database directory
pub fn wal_file(dir: &Path) -> PathBuf {
    dir.join(roster_storage::wal::WAL_FILE_NAME)
}

/// Create `id` in `posts` from a JSON object
pub fn seed(db: &Roster, id: &str, fields: &str) -> Record {
    db.posts
        .create_json(id, fields)
        .expect("Failed to seed record")
}

/// Bring a fresh record to `version` with empty updates
pub fn seed_at_version(db: &Roster, id: &str, fields: &str, version: u64) -> Record {
    let mut record = seed(db, id, fields);
    while record.version.as_u64() < version {
        let request = UpdateRequest::builder(id, record.version.as_u64())
            .build()
            .unwrap();
        record = db.posts.update(request).unwrap();
    }
    record
}
