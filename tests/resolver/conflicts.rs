//! Version checks: success, conflict, not-found.

use crate::common::*;
use roster::prelude::*;

#[test]
fn success_advances_version_by_exactly_one() {
    let db = ephemeral_db();
    let created = seed(&db, "p1", r#"{"title":"A"}"#);
    assert_eq!(created.version, Version::INITIAL);

    let updated = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"title":"B"}"#)
        .unwrap();
    assert_eq!(updated.version.as_u64(), 2);
    assert_eq!(db.posts.get("p1").unwrap().unwrap(), updated);
}

#[test]
fn conflict_leaves_record_unchanged() {
    let db = ephemeral_db();
    let before = seed_at_version(&db, "p1", r#"{"title":"A"}"#, 3);

    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":2,"title":"B"}"#)
        .unwrap_err();
    match &err {
        Error::Conflict {
            id,
            expected,
            actual,
        } => {
            assert_eq!(id, "p1");
            assert_eq!(*expected, 2);
            assert_eq!(*actual, 3);
        }
        other => panic!("expected conflict, got {:?}", other),
    }
    assert!(err.is_retryable());
    assert_eq!(db.posts.get("p1").unwrap().unwrap(), before);
}

#[test]
fn newer_expected_version_also_conflicts() {
    let db = ephemeral_db();
    seed(&db, "p1", "{}");
    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":5,"x":1}"#)
        .unwrap_err();
    assert!(err.is_conflict());
}

#[test]
fn missing_record_is_not_found_for_any_version() {
    let db = ephemeral_db();
    for expected in [1, 2, 99] {
        let request = UpdateRequest::builder("ghost", expected)
            .set("title", "x")
            .build()
            .unwrap();
        let err = db.posts.update(request).unwrap_err();
        assert!(err.is_not_found(), "version {}: {:?}", expected, err);
        assert!(!err.is_retryable());
    }
    assert!(db.posts.get("ghost").unwrap().is_none());
}

#[test]
fn version_zero_is_rejected_before_the_store() {
    let db = ephemeral_db();
    seed(&db, "p1", "{}");
    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":0,"x":1}"#)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(db.posts.get("p1").unwrap().unwrap().version.as_u64(), 1);
}

#[test]
fn scenario_p1_at_version_three() {
    let db = ephemeral_db();
    seed_at_version(&db, "p1", r#"{"title":"A","draft":true}"#, 3);

    let updated = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":3,"title":"B","draft":null}"#)
        .unwrap();
    assert_eq!(updated.version.as_u64(), 4);
    assert_eq!(updated.get("title"), Some(&Value::from("B")));
    assert!(!updated.contains("draft"));

    // Replaying the same request is now stale
    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":3,"title":"C"}"#)
        .unwrap_err();
    assert!(err.is_conflict());
    let current = db.posts.get("p1").unwrap().unwrap();
    assert_eq!(current.version.as_u64(), 4);
    assert_eq!(current.get("title"), Some(&Value::from("B")));
}

#[test]
fn conflict_envelope_names_both_versions() {
    let db = ephemeral_db();
    seed_at_version(&db, "p1", "{}", 2);
    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1}"#)
        .unwrap_err();
    let json = err.to_json();
    assert_eq!(json["code"], "Conflict");
    assert_eq!(json["details"]["id"], "p1");
    assert_eq!(json["details"]["expectedVersion"], 1);
    assert_eq!(json["details"]["actualVersion"], 2);
}

#[test]
fn create_twice_is_already_exists() {
    let db = ephemeral_db();
    seed(&db, "p1", "{}");
    let err = db.posts.create_json("p1", "{}").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }));
    assert_eq!(err.to_json()["code"], "AlreadyExists");
}

#[test]
fn conditional_delete() {
    let db = ephemeral_db();
    seed_at_version(&db, "p1", "{}", 2);

    let err = db.posts.delete("p1", Some(1)).unwrap_err();
    assert!(err.is_conflict());
    assert!(db.posts.get("p1").unwrap().is_some());

    assert!(db.posts.delete("p1", Some(2)).unwrap());
    assert!(db.posts.get("p1").unwrap().is_none());
    assert!(!db.posts.delete("p1", None).unwrap());
}
