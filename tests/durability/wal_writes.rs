//! What reaches the log.

use crate::common::*;
use roster::prelude::*;

#[test]
fn conflicting_update_appends_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = durable_db(dir.path(), DurabilityMode::Strict);
    seed_at_version(&db, "p1", r#"{"title":"A"}"#, 2);

    let before = db.stats().wal_bytes;
    let on_disk = std::fs::metadata(wal_file(dir.path())).unwrap().len();
    assert_eq!(before, on_disk);

    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"title":"B"}"#)
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(db.stats().wal_bytes, before);
    assert_eq!(std::fs::metadata(wal_file(dir.path())).unwrap().len(), on_disk);
}

#[test]
fn rejected_requests_append_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = durable_db(dir.path(), DurabilityMode::Strict);
    seed(&db, "p1", "{}");
    let before = db.stats().wal_bytes;

    assert!(db.posts.update_json(r#"{"id":"p1","expectedVersion":0}"#).is_err());
    assert!(db.posts.update_json(r#"{"id":"ghost","expectedVersion":1}"#).is_err());
    assert!(db.posts.create_json("p1", "{}").is_err());
    assert!(db.posts.delete("p1", Some(9)).is_err());
    assert!(!db.posts.delete("ghost", None).unwrap());

    assert_eq!(db.stats().wal_bytes, before);
}

#[test]
fn each_successful_write_grows_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let db = durable_db(dir.path(), DurabilityMode::Strict);

    let mut last = db.stats().wal_bytes;
    seed(&db, "p1", "{}");
    for v in 1..=3u64 {
        let request = UpdateRequest::builder("p1", v).set("n", v as i64).build().unwrap();
        db.posts.update(request).unwrap();
        let now = db.stats().wal_bytes;
        assert!(now > last);
        last = now;
    }
    assert_eq!(db.durability_mode(), Some(DurabilityMode::Strict));
    assert_eq!(db.path(), Some(dir.path()));
}

#[test]
fn no_durability_still_replays_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = durable_db(dir.path(), DurabilityMode::None);
        seed(&db, "p1", r#"{"x":1}"#);
    }
    let db = durable_db(dir.path(), DurabilityMode::None);
    assert_eq!(
        db.posts.get("p1").unwrap().unwrap().get("x"),
        Some(&Value::Int(1))
    );
}
