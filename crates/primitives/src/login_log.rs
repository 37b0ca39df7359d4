//! LoginLog: append-only record of user logins
//!
//! Each login is a record in the `logins` table with a random UUID id and
//! two fields, `uid` and `loginTime` (milliseconds since the Unix epoch).
//! Entries are never updated.

use crate::resolver::UpdateResolver;
use chrono::{DateTime, Utc};
use roster_core::{
    AtomicConditionalStore, Error, FieldKind, FieldName, FieldSpec, Record, RecordId, Result,
    TableName, TableSchema, Timestamp, Value,
};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Table holding login entries
pub const LOGINS_TABLE: &str = "logins";

/// Field holding the user id
pub const UID_FIELD: &str = "uid";

/// Field holding the login time
pub const LOGIN_TIME_FIELD: &str = "loginTime";

/// Entries returned by [`LoginLog::recent`] when the caller does not choose
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// One login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginEntry {
    /// Record id
    pub id: RecordId,
    /// User who logged in
    pub uid: String,
    /// When, in milliseconds since the Unix epoch
    pub login_time: Timestamp,
}

impl LoginEntry {
    /// Read an entry back from its record
    ///
    /// Returns `None` for records without a string `uid` or an integer
    /// `loginTime`.
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.id.clone(),
            uid: record.get(UID_FIELD)?.as_str()?.to_string(),
            login_time: record.get(LOGIN_TIME_FIELD)?.as_int()?,
        })
    }

    /// Login time as a UTC date-time
    pub fn login_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.login_time)
    }
}

/// Schema of the `logins` table
pub fn logins_schema() -> Result<TableSchema> {
    TableSchema::new(TableName::new(LOGINS_TABLE)?)
        .field(UID_FIELD, FieldSpec::required(FieldKind::String))?
        .field(LOGIN_TIME_FIELD, FieldSpec::required(FieldKind::Int))
}

/// Login history over any record store
#[derive(Debug, Clone)]
pub struct LoginLog<S> {
    logins: UpdateResolver<S>,
}

impl<S: AtomicConditionalStore> LoginLog<S> {
    /// Create a login log backed by `store`
    pub fn new(store: S) -> Result<Self> {
        Ok(Self {
            logins: UpdateResolver::new(store, logins_schema()?),
        })
    }

    /// Record a login by `uid` at `at`
    pub fn record(&self, uid: &str, at: Timestamp) -> Result<LoginEntry> {
        if uid.is_empty() {
            return Err(Error::invalid("uid must not be empty"));
        }
        let mut fields = BTreeMap::new();
        fields.insert(FieldName::new(UID_FIELD)?, Value::from(uid));
        fields.insert(FieldName::new(LOGIN_TIME_FIELD)?, Value::Int(at));

        let id = RecordId::new(Uuid::new_v4().to_string())?;
        let record = self.logins.create(id, fields)?;
        debug!(uid, login_time = at, "login recorded");
        LoginEntry::from_record(&record)
            .ok_or_else(|| Error::Internal("login record lost its fields".to_string()))
    }

    /// Record a login by `uid` now
    pub fn record_now(&self, uid: &str) -> Result<LoginEntry> {
        self.record(uid, Utc::now().timestamp_millis())
    }

    /// Most recent logins, newest first, at most `limit`
    pub fn recent(&self, limit: usize) -> Result<Vec<LoginEntry>> {
        self.query(limit, |_| true)
    }

    /// Most recent logins by one user, newest first, at most `limit`
    pub fn for_user(&self, uid: &str, limit: usize) -> Result<Vec<LoginEntry>> {
        self.query(limit, |entry| entry.uid == uid)
    }

    /// Total number of entries
    pub fn len(&self) -> Result<usize> {
        Ok(self.logins.store().scan(self.logins.table())?.len())
    }

    /// Check if no login has been recorded
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn query(&self, limit: usize, keep: impl Fn(&LoginEntry) -> bool) -> Result<Vec<LoginEntry>> {
        let mut entries: Vec<LoginEntry> = self
            .logins
            .store()
            .scan(self.logins.table())?
            .iter()
            .filter_map(LoginEntry::from_record)
            .filter(|entry| keep(entry))
            .collect();
        // Newest first; id breaks ties so equal timestamps sort stably
        entries.sort_by(|a, b| b.login_time.cmp(&a.login_time).then_with(|| a.id.cmp(&b.id)));
        entries.truncate(limit);
        Ok(entries)
    }
}
