//! Durability Integration Tests
//!
//! Reopen, crash-tail and conflict behavior of disk-backed databases.

#[path = "../common/mod.rs"]
mod common;

mod recovery;
mod wal_writes;
