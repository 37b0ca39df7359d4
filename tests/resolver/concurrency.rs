//! Races on the same expected version.

use crate::common::*;
use rand::Rng;
use roster::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn race_on_same_version_has_exactly_one_winner() {
    const THREADS: usize = 8;

    for round in 0..20 {
        let db = Arc::new(ephemeral_db());
        seed(&db, "p1", r#"{"title":"A"}"#);
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let db = Arc::clone(&db);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let request = UpdateRequest::builder("p1", 1)
                        .set("title", format!("writer-{}", i))
                        .build()
                        .unwrap();
                    barrier.wait();
                    db.posts.update(request).map(|r| (i, r))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1, "round {}", round);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.is_conflict()));

        let (winner, written) = winners[0];
        let stored = db.posts.get("p1").unwrap().unwrap();
        assert_eq!(stored.version.as_u64(), 2);
        assert_eq!(stored.get("title"), Some(&Value::from(format!("writer-{}", winner))));
        assert_eq!(&stored, written);
    }
}

#[test]
fn writers_on_different_records_do_not_interfere() {
    const THREADS: usize = 8;
    const UPDATES: u64 = 50;

    let db = Arc::new(ephemeral_db());
    for i in 0..THREADS {
        seed(&db, &format!("p{}", i), "{}");
    }
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let id = format!("p{}", i);
                barrier.wait();
                for v in 1..=UPDATES {
                    let request = UpdateRequest::builder(id.as_str(), v)
                        .set("n", v as i64)
                        .build()
                        .unwrap();
                    db.posts.update(request).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for record in db.posts.list().unwrap() {
        assert_eq!(record.version.as_u64(), UPDATES + 1);
        assert_eq!(record.get("n"), Some(&Value::Int(UPDATES as i64)));
    }
}

#[test]
fn random_writers_never_lose_an_update() {
    const THREADS: usize = 6;
    const RECORDS: usize = 4;
    const ATTEMPTS: usize = 200;

    let db = Arc::new(ephemeral_db());
    for i in 0..RECORDS {
        seed(&db, &format!("r{}", i), "{}");
    }
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                let mut wins = 0u64;
                barrier.wait();
                for _ in 0..ATTEMPTS {
                    let id = format!("r{}", rng.gen_range(0..RECORDS));
                    let current = db.posts.get(&id).unwrap().unwrap();
                    let request = UpdateRequest::builder(id.as_str(), current.version.as_u64())
                        .set("last", rng.gen_range(0..1_000i64))
                        .build()
                        .unwrap();
                    match db.posts.update(request) {
                        Ok(_) => wins += 1,
                        Err(e) => assert!(e.is_conflict(), "{:?}", e),
                    }
                }
                wins
            })
        })
        .collect();
    let wins: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    // Every successful update moved exactly one version forward
    let bumps: u64 = db
        .posts
        .list()
        .unwrap()
        .iter()
        .map(|r| r.version.as_u64() - 1)
        .sum();
    assert_eq!(bumps, wins);
}
