//! Property tests against a plain map model.

use crate::common::*;
use proptest::prelude::*;
use roster::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Set(String, i64),
    Remove(String),
}

fn op() -> impl Strategy<Value = Op> {
    let field = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
    prop_oneof![
        (field.clone(), -3i64..3).prop_map(|(f, v)| Op::Set(f, v)),
        field.prop_map(Op::Remove),
    ]
}

/// An update attempt: expected-version offset from the current one, then ops
fn attempt() -> impl Strategy<Value = (i64, Vec<Op>)> {
    (prop_oneof![3 => Just(0i64), 1 => -2i64..3], prop::collection::vec(op(), 0..5))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn updates_match_model(attempts in prop::collection::vec(attempt(), 1..30)) {
        let db = ephemeral_db();
        db.posts.create_json("p1", "{}").unwrap();

        let mut model: BTreeMap<String, i64> = BTreeMap::new();
        let mut version = 1u64;

        for (offset, ops) in attempts {
            let expected = version as i64 + offset;
            if expected < 1 {
                continue;
            }
            let mut builder = UpdateRequest::builder("p1", expected as u64);
            for op in &ops {
                builder = match op {
                    Op::Set(f, v) => builder.set(f.as_str(), *v),
                    Op::Remove(f) => builder.remove(f.as_str()),
                };
            }
            let result = db.posts.update(builder.build().unwrap());

            if expected as u64 == version {
                let record = result.unwrap();
                // Later instructions for a field win
                let mut last: BTreeMap<&str, &Op> = BTreeMap::new();
                for op in &ops {
                    let f = match op {
                        Op::Set(f, _) | Op::Remove(f) => f.as_str(),
                    };
                    last.insert(f, op);
                }
                for op in last.values() {
                    match op {
                        Op::Set(f, v) => { model.insert(f.clone(), *v); }
                        Op::Remove(f) => { model.remove(f); }
                    }
                }
                version += 1;
                prop_assert_eq!(record.version.as_u64(), version);
            } else {
                prop_assert!(result.unwrap_err().is_conflict());
            }

            let stored = db.posts.get("p1").unwrap().unwrap();
            prop_assert_eq!(stored.version.as_u64(), version);
            let fields: BTreeMap<String, i64> = stored
                .fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_int().unwrap()))
                .collect();
            prop_assert_eq!(&fields, &model);
        }
    }

    #[test]
    fn falsy_values_always_persist(
        n in prop_oneof![Just(0i64), any::<i64>()],
        s in "[a-z]{0,3}",
        b in any::<bool>(),
    ) {
        let db = ephemeral_db();
        db.posts.create_json("p1", "{}").unwrap();
        let request = UpdateRequest::builder("p1", 1)
            .set("n", n)
            .set("s", s.as_str())
            .set("b", b)
            .build()
            .unwrap();
        let record = db.posts.update(request).unwrap();
        prop_assert_eq!(record.get("n"), Some(&Value::Int(n)));
        prop_assert_eq!(record.get("s"), Some(&Value::from(s.as_str())));
        prop_assert_eq!(record.get("b"), Some(&Value::Bool(b)));
    }
}
