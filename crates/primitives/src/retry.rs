//! Reload-and-retry for callers
//!
//! The resolver never retries on its own. This helper implements the usual
//! caller policy: read the current record, build a request against its
//! version, apply, and on conflict start over with a fresh read.
//!
//! ## Purity Requirement
//!
//! The builder closure may be called several times. It must be a pure
//! function of the record it is given: no I/O, no mutation of captured
//! state, no irreversible effects.

use crate::resolver::UpdateResolver;
use roster_core::{AtomicConditionalStore, Error, Record, RecordId, Result, UpdateRequestBuilder};
use tracing::debug;

/// Attempts made by [`retry_update`] when the caller does not choose
pub const DEFAULT_MAX_ATTEMPTS: usize = 8;

/// Apply an update built from the latest record, retrying on conflict
///
/// `build` receives the freshly read record and returns the field
/// instructions; the id and expected version are filled in from that record.
/// Only conflicts are retried. `NotFound`, validation and store errors are
/// returned immediately. After `max_attempts` conflicts the last one is
/// returned.
///
/// # Example
///
/// ```
/// use roster_core::{RecordId, TableName, TableSchema, Value};
/// use roster_primitives::{retry_update, UpdateResolver, DEFAULT_MAX_ATTEMPTS};
/// use roster_storage::ShardedStore;
/// use std::collections::BTreeMap;
///
/// let counters = UpdateResolver::new(
///     ShardedStore::new(),
///     TableSchema::open(TableName::new("counters").unwrap()),
/// );
/// let id = RecordId::new("visits").unwrap();
/// counters.create(id.clone(), BTreeMap::new()).unwrap();
///
/// let record = retry_update(&counters, &id, DEFAULT_MAX_ATTEMPTS, |current, update| {
///     let n = current.get("n").and_then(Value::as_int).unwrap_or(0);
///     update.set("n", n + 1)
/// })
/// .unwrap();
/// assert_eq!(record.get("n"), Some(&Value::Int(1)));
/// ```
pub fn retry_update<S, F>(
    resolver: &UpdateResolver<S>,
    id: &RecordId,
    max_attempts: usize,
    mut build: F,
) -> Result<Record>
where
    S: AtomicConditionalStore,
    F: FnMut(&Record, UpdateRequestBuilder) -> UpdateRequestBuilder,
{
    if max_attempts == 0 {
        return Err(Error::invalid("max_attempts must be at least 1"));
    }

    let mut attempt = 1;
    loop {
        let current = resolver.get_existing(id)?;
        let builder = UpdateRequestBuilder::new(id.as_str(), current.version.as_u64());
        let request = build(&current, builder).build()?;

        match resolver.apply(request) {
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                debug!(%id, attempt, "conflict, retrying with fresh read");
                attempt += 1;
            }
            other => return other,
        }
    }
}
