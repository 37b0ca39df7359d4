//! High-level primitives for Roster
//!
//! This crate builds the caller-facing operations on top of any
//! [`AtomicConditionalStore`](roster_core::AtomicConditionalStore):
//! - UpdateResolver: version-guarded partial updates of one table
//! - retry_update: the reload-and-retry loop callers run on conflict
//! - LoginLog: append-only login history with "most recent" queries
//!
//! All primitives are stateless facades; state lives in the store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod login_log;
pub mod resolver;
pub mod retry;

pub use login_log::{logins_schema, LoginEntry, LoginLog, DEFAULT_RECENT_LIMIT, LOGINS_TABLE};
pub use resolver::UpdateResolver;
pub use retry::{retry_update, DEFAULT_MAX_ATTEMPTS};
