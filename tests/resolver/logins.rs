//! Login history ordering and limits.

use crate::common::*;

#[test]
fn recent_is_newest_first_and_limited() {
    let db = ephemeral_db();
    for (i, uid) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
        db.logins.record_at(uid, 1_000 * (i as i64 + 1)).unwrap();
    }

    let recent = db.logins.recent().unwrap();
    assert_eq!(recent.len(), 5);
    let uids: Vec<_> = recent.iter().map(|e| e.uid.as_str()).collect();
    assert_eq!(uids, ["g", "f", "e", "d", "c"]);
    assert!(recent.windows(2).all(|w| w[0].login_time >= w[1].login_time));

    assert_eq!(db.logins.recent_limit(2).unwrap().len(), 2);
    assert_eq!(db.logins.recent_limit(100).unwrap().len(), 7);
    assert!(db.logins.recent_limit(0).unwrap().is_empty());
    assert_eq!(db.logins.count().unwrap(), 7);
}

#[test]
fn for_user_filters_before_limiting() {
    let db = ephemeral_db();
    db.logins.record_at("alice", 1_000).unwrap();
    for t in 2..10 {
        db.logins.record_at("bob", t * 1_000).unwrap();
    }
    db.logins.record_at("alice", 20_000).unwrap();

    let alice = db.logins.for_user("alice", 5).unwrap();
    assert_eq!(alice.len(), 2);
    assert_eq!(alice[0].login_time, 20_000);
    assert_eq!(alice[1].login_time, 1_000);
}

#[test]
fn logins_do_not_appear_in_posts() {
    let db = ephemeral_db();
    db.logins.record("alice").unwrap();
    assert!(db.posts.list().unwrap().is_empty());
    assert_eq!(db.stats().records, 1);
}

#[test]
fn login_time_converts_to_utc() {
    let db = ephemeral_db();
    let entry = db.logins.record_at("alice", 86_400_000).unwrap();
    let at = entry.login_time_utc().unwrap();
    assert_eq!(at.to_rfc3339(), "1970-01-02T00:00:00+00:00");
}
