//! Login history.
//!
//! # Example
//!
//! ```
//! use roster::prelude::*;
//!
//! let db = Roster::ephemeral()?;
//! db.logins.record_at("alice", 1_000)?;
//! db.logins.record_at("bob", 2_000)?;
//!
//! let recent = db.logins.recent()?;
//! assert_eq!(recent[0].uid, "bob");
//! # Ok::<(), roster::Error>(())
//! ```

use crate::error::Result;
use crate::types::{LoginEntry, SharedStore, Timestamp, DEFAULT_RECENT_LIMIT};
use roster_primitives::LoginLog;

/// Login history operations.
///
/// Access via `db.logins`.
#[derive(Clone)]
pub struct Logins {
    log: LoginLog<SharedStore>,
}

impl Logins {
    pub(crate) fn new(store: SharedStore) -> Result<Self> {
        Ok(Self {
            log: LoginLog::new(store)?,
        })
    }

    /// Record a login now.
    pub fn record(&self, uid: &str) -> Result<LoginEntry> {
        Ok(self.log.record_now(uid)?)
    }

    /// Record a login at a given time (milliseconds since the Unix epoch).
    pub fn record_at(&self, uid: &str, at: Timestamp) -> Result<LoginEntry> {
        Ok(self.log.record(uid, at)?)
    }

    /// The five most recent logins, newest first.
    pub fn recent(&self) -> Result<Vec<LoginEntry>> {
        self.recent_limit(DEFAULT_RECENT_LIMIT)
    }

    /// The `limit` most recent logins, newest first.
    pub fn recent_limit(&self, limit: usize) -> Result<Vec<LoginEntry>> {
        Ok(self.log.recent(limit)?)
    }

    /// The `limit` most recent logins of one user, newest first.
    pub fn for_user(&self, uid: &str, limit: usize) -> Result<Vec<LoginEntry>> {
        Ok(self.log.for_user(uid, limit)?)
    }

    /// Number of recorded logins.
    pub fn count(&self) -> Result<usize> {
        Ok(self.log.len()?)
    }
}
