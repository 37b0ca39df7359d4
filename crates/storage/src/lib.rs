//! Storage layer for Roster
//!
//! This crate implements the reference record stores:
//! - ShardedStore: DashMap of per-table FxHashMaps, in-memory only
//! - DurableStore: ShardedStore plus a write-ahead log
//! - WAL framing with CRC32 checksums
//! - Replay-based crash recovery
//! - Durability modes (none, strict, batched)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod durability;
pub mod durable;
pub mod recovery;
pub mod sharded;
pub mod wal;

pub use durability::DurabilityMode;
pub use durable::DurableStore;
pub use recovery::{RecoveryOptions, RecoveryStats};
pub use sharded::{Shard, ShardedStore};
pub use wal::{Wal, WalEntry};
