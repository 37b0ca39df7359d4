//! Recovery after reopen and after a torn write.

use crate::common::*;
use roster::prelude::*;
use std::fs::OpenOptions;
use std::io::Write;

#[test]
fn reopen_recovers_records_with_versions() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = durable_db(dir.path(), DurabilityMode::Strict);
        seed_at_version(&db, "p1", r#"{"title":"A","draft":true}"#, 3);
        db.posts
            .update_json(r#"{"id":"p1","expectedVersion":3,"title":"B","draft":null}"#)
            .unwrap();
        seed(&db, "p2", r#"{"title":"gone"}"#);
        db.posts.delete("p2", Some(1)).unwrap();
        db.logins.record_at("alice", 5_000).unwrap();
        db.close().unwrap();
    }

    let db = durable_db(dir.path(), DurabilityMode::Strict);
    let p1 = db.posts.get("p1").unwrap().unwrap();
    assert_eq!(p1.version.as_u64(), 4);
    assert_eq!(p1.get("title"), Some(&Value::from("B")));
    assert!(!p1.contains("draft"));
    assert!(db.posts.get("p2").unwrap().is_none());

    let logins = db.logins.recent().unwrap();
    assert_eq!(logins.len(), 1);
    assert_eq!(logins[0].uid, "alice");

    let stats = db.recovery_stats().unwrap();
    assert!(stats.entries_applied >= 6);
    assert_eq!(stats.discarded_bytes, 0);

    // Versions keep counting from where they were
    let p1 = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":4,"title":"C"}"#)
        .unwrap();
    assert_eq!(p1.version.as_u64(), 5);
}

#[test]
fn batched_mode_recovers_after_close() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = durable_db(dir.path(), DurabilityMode::buffered_default());
        for i in 0..20 {
            seed(&db, &format!("p{}", i), r#"{"n":0}"#);
        }
        db.close().unwrap();
    }
    let db = durable_db(dir.path(), DurabilityMode::buffered_default());
    assert_eq!(db.posts.list().unwrap().len(), 20);
}

#[test]
fn torn_tail_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = durable_db(dir.path(), DurabilityMode::Strict);
        seed(&db, "p1", r#"{"title":"A"}"#);
        db.posts
            .update_json(r#"{"id":"p1","expectedVersion":1,"title":"B"}"#)
            .unwrap();
    }
    let clean_len = std::fs::metadata(wal_file(dir.path())).unwrap().len();

    // Half a frame: a length prefix promising more bytes than follow
    let mut file = OpenOptions::new()
        .append(true)
        .open(wal_file(dir.path()))
        .unwrap();
    file.write_all(&[0x80, 0x00, 0x00, 0x00, 0xDE, 0xAD]).unwrap();
    drop(file);

    let db = durable_db(dir.path(), DurabilityMode::Strict);
    let p1 = db.posts.get("p1").unwrap().unwrap();
    assert_eq!(p1.version.as_u64(), 2);
    assert_eq!(p1.get("title"), Some(&Value::from("B")));

    let stats = db.recovery_stats().unwrap();
    assert_eq!(stats.discarded_bytes, 6);
    assert_eq!(stats.valid_len, clean_len);

    // The log is writable again past the cut
    db.posts
        .update_json(r#"{"id":"p1","expectedVersion":2,"title":"C"}"#)
        .unwrap();
    drop(db);
    let db = durable_db(dir.path(), DurabilityMode::Strict);
    assert_eq!(db.posts.get("p1").unwrap().unwrap().version.as_u64(), 3);
    assert_eq!(db.recovery_stats().unwrap().discarded_bytes, 0);
}

#[test]
fn strict_recovery_refuses_damaged_log() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = durable_db(dir.path(), DurabilityMode::Strict);
        seed(&db, "p1", "{}");
    }
    let mut file = OpenOptions::new()
        .append(true)
        .open(wal_file(dir.path()))
        .unwrap();
    file.write_all(&[0xFF; 3]).unwrap();
    drop(file);

    let err = Roster::builder()
        .path(dir.path())
        .strict()
        .recovery(RecoveryOptions::strict())
        .open()
        .err()
        .unwrap();
    assert!(err.is_serious());
}

#[test]
fn ephemeral_has_no_recovery() {
    let db = ephemeral_db();
    assert!(db.is_ephemeral());
    assert!(db.path().is_none());
    assert!(db.recovery_stats().is_none());
    assert_eq!(db.stats().wal_bytes, 0);
}
