//! Field semantics: overwrite, omission, removal, falsy values, reserved names.

use crate::common::*;
use roster::prelude::*;
use roster::ErrorKind;

#[test]
fn omitted_fields_are_untouched() {
    let db = ephemeral_db();
    seed(&db, "p1", r#"{"title":"A","body":"text","tags":["x"]}"#);

    let updated = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"title":"B"}"#)
        .unwrap();
    assert_eq!(updated.get("title"), Some(&Value::from("B")));
    assert_eq!(updated.get("body"), Some(&Value::from("text")));
    assert_eq!(
        updated.get("tags"),
        Some(&Value::Array(vec![Value::from("x")]))
    );
}

#[test]
fn null_removes_and_absent_field_removal_is_noop() {
    let db = ephemeral_db();
    seed(&db, "p1", r#"{"title":"A","draft":true}"#);

    let updated = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"draft":null,"never":null}"#)
        .unwrap();
    assert!(!updated.contains("draft"));
    assert!(!updated.contains("never"));
    assert_eq!(updated.len(), 1);
    assert_eq!(updated.version.as_u64(), 2);
}

#[test]
fn falsy_values_are_set_not_removed() {
    let db = ephemeral_db();
    seed(&db, "p1", r#"{"count":5,"name":"n","flag":true}"#);

    let updated = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"count":0,"name":"","flag":false}"#)
        .unwrap();
    assert_eq!(updated.get("count"), Some(&Value::Int(0)));
    assert_eq!(updated.get("name"), Some(&Value::from("")));
    assert_eq!(updated.get("flag"), Some(&Value::Bool(false)));
}

#[test]
fn typed_builder_matches_json_request() {
    let db = ephemeral_db();
    seed(&db, "p1", r#"{"title":"A","draft":true}"#);
    seed(&db, "p2", r#"{"title":"A","draft":true}"#);

    let typed = UpdateRequest::builder("p1", 1)
        .set("title", "B")
        .update("draft", FieldUpdate::from_nullable(None))
        .build()
        .unwrap();
    let a = db.posts.update(typed).unwrap();
    let b = db
        .posts
        .update_json(r#"{"id":"p2","expectedVersion":1,"title":"B","draft":null}"#)
        .unwrap();
    assert_eq!(a.fields, b.fields);
    assert_eq!(a.version, b.version);
}

#[test]
fn empty_update_only_bumps_version() {
    let db = ephemeral_db();
    let before = seed(&db, "p1", r#"{"title":"A"}"#);
    let after = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1}"#)
        .unwrap();
    assert_eq!(after.fields, before.fields);
    assert_eq!(after.version.as_u64(), 2);
}

#[test]
fn reserved_fields_cannot_be_targeted() {
    let db = ephemeral_db();
    seed(&db, "p1", "{}");

    assert!(FieldName::new("id").is_err());
    assert!(FieldName::new("version").is_err());
    assert!(UpdateRequest::builder("p1", 1)
        .set("version", 10)
        .build()
        .is_err());

    let err = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"version":10}"#)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)), "{:?}", err);
    let err = db.posts.create_json("p2", r#"{"version":7}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidRequest(_)));

    assert_eq!(db.posts.get("p1").unwrap().unwrap().version.as_u64(), 1);
}

#[test]
fn missing_keys_and_bad_json_are_invalid_requests() {
    let db = ephemeral_db();
    for body in [
        r#"{"expectedVersion":1}"#,
        r#"{"id":"p1"}"#,
        r#"{"id":"p1","expectedVersion":"1"}"#,
        r#"{"id":"p1","expectedVersion":-1}"#,
        r#"[1,2]"#,
        r#"{"id":"p1","#,
    ] {
        let err = db.posts.update_json(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{}", body);
    }
}

#[test]
fn schema_rejects_wrong_kinds_before_writing() {
    let schema = TableSchema::new(TableName::new("posts").unwrap())
        .field("title", FieldSpec::required(FieldKind::String))
        .unwrap()
        .field("draft", FieldSpec::optional(FieldKind::Bool))
        .unwrap();
    let db = Roster::builder().posts_schema(schema).open_ephemeral().unwrap();

    // Required field missing on create
    assert!(db.posts.create_json("p1", r#"{"draft":true}"#).is_err());
    db.posts
        .create_json("p1", r#"{"title":"A","draft":true}"#)
        .unwrap();

    for body in [
        r#"{"id":"p1","expectedVersion":1,"title":7}"#,
        r#"{"id":"p1","expectedVersion":1,"title":null}"#,
        r#"{"id":"p1","expectedVersion":1,"extra":1}"#,
    ] {
        let err = db.posts.update_json(body).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)), "{}", body);
    }
    assert_eq!(db.posts.get("p1").unwrap().unwrap().version.as_u64(), 1);

    let ok = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"draft":null}"#)
        .unwrap();
    assert!(!ok.contains("draft"));
}

#[test]
fn bytes_and_floats_survive_the_wire() {
    let db = ephemeral_db();
    seed(&db, "p1", "{}");
    let updated = db
        .posts
        .update_json(r#"{"id":"p1","expectedVersion":1,"blob":{"$bytes":"AQID"},"score":1.5}"#)
        .unwrap();
    assert_eq!(updated.get("blob"), Some(&Value::Bytes(vec![1, 2, 3])));
    assert_eq!(updated.get("score"), Some(&Value::Float(1.5)));
}
