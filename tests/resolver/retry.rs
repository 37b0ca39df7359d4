//! Read-modify-write retry under contention.

use crate::common::*;
use roster::prelude::*;
use roster::DEFAULT_MAX_ATTEMPTS;
use std::sync::{Arc, Barrier};
use std::thread;

fn increment(record: &Record, update: UpdateRequestBuilder) -> UpdateRequestBuilder {
    let n = record.get("counter").and_then(Value::as_int).unwrap_or(0);
    update.set("counter", n + 1)
}

#[test]
fn concurrent_increments_all_land() {
    const THREADS: usize = 8;

    let db = Arc::new(ephemeral_db());
    seed(&db, "c1", r#"{"counter":0}"#);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                // Each conflict means another writer landed, so THREADS attempts suffice
                db.posts.update_with_retry("c1", THREADS, increment)
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }

    let record = db.posts.get("c1").unwrap().unwrap();
    assert_eq!(record.get("counter"), Some(&Value::Int(THREADS as i64)));
    assert_eq!(record.version.as_u64(), 1 + THREADS as u64);
}

#[test]
fn retry_on_missing_record_is_not_found() {
    let db = ephemeral_db();
    let err = db
        .posts
        .update_with_retry("ghost", DEFAULT_MAX_ATTEMPTS, increment)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn retry_does_not_retry_invalid_requests() {
    let db = ephemeral_db();
    seed(&db, "c1", "{}");
    let mut calls = 0;
    let err = db
        .posts
        .update_with_retry("c1", DEFAULT_MAX_ATTEMPTS, |_, update| {
            calls += 1;
            update.set("version", 9)
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(calls, 1);
}

#[test]
fn zero_attempts_is_invalid() {
    let db = ephemeral_db();
    seed(&db, "c1", "{}");
    let err = db.posts.update_with_retry("c1", 0, increment).unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(db.posts.get("c1").unwrap().unwrap().version.as_u64(), 1);
}
