use exception_context as exc;
use exc::{Context, Error, Predicate, Transform};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

proptest! {
    #[test]
    fn set_then_get_returns_value(key in "[a-z]{1,8}", value in scalar()) {
        let mut ctx = Context::new();
        ctx.set(key.clone(), value.clone()).unwrap();
        prop_assert_eq!(ctx.get(&key).unwrap(), &value);
    }

    #[test]
    fn set_on_present_key_always_fails(key in "[a-z]{1,8}", a in scalar(), b in scalar()) {
        let mut ctx = Context::new();
        ctx.set(key.clone(), a.clone()).unwrap();
        prop_assert!(matches!(ctx.set(key.clone(), b.clone()), Err(Error::DuplicateKey(_))));
        ctx.force_set(key.clone(), b.clone());
        prop_assert_eq!(ctx.get(&key).unwrap(), &b);
    }

    #[test]
    fn absent_keys_fail_everywhere(key in "[a-z]{1,8}") {
        let mut ctx = Context::new();
        prop_assert!(matches!(ctx.get(&key), Err(Error::MissingKey(_))));
        prop_assert!(matches!(ctx.update(&key, 1), Err(Error::MissingKey(_))));
        prop_assert!(matches!(ctx.delete([key.as_str()]), Err(Error::MissingKey(_))));
    }

    #[test]
    fn separate_follows_request_order(mut keys in proptest::collection::hash_set("[a-z]{1,6}", 1..8)
        .prop_map(|s| s.into_iter().collect::<Vec<_>>()))
    {
        let mut ctx = Context::new();
        for (i, k) in keys.iter().enumerate() {
            ctx.set(k.clone(), i as i64).unwrap();
        }
        keys.reverse();
        let expected: Vec<Value> = keys.iter().map(|k| ctx.get(k).unwrap().clone()).collect();
        prop_assert_eq!(ctx.separate(&keys).unwrap(), expected);
    }

    #[test]
    fn gate_covers_exactly_one_call(present in any::<bool>()) {
        let mut ctx = Context::new();
        if present {
            ctx.set("flag", true).unwrap();
        }
        let ran = ctx.if_has("flag").force_set("gated", 1).is_some();
        prop_assert_eq!(ran, present);
        prop_assert_eq!(ctx.has("gated"), present);
        ctx.set("next", 1).unwrap();
        prop_assert!(ctx.has("next"));
    }
}

#[test]
fn guard_lookup_leaves_the_gate_armed() {
    let mut ctx = Context::new();
    ctx.set("flag", true).unwrap();

    let closed = ctx.if_not_has("flag");
    assert!(closed.has("flag"));
    assert!(!closed.has("other"));
    assert_eq!(closed.set("gated", 1).unwrap(), None);
    assert!(!ctx.has("gated"));

    let open = ctx.if_has("flag");
    assert!(!open.has("gated"));
    assert_eq!(open.set("gated", 1).unwrap(), Some(()));
    assert!(ctx.has("gated"));
}

#[test]
fn delete_without_rollback() {
    let mut ctx = Context::new();
    ctx.set("A", 1).unwrap();
    ctx.set("B", 2).unwrap();
    ctx.set("C", 3).unwrap();
    assert!(ctx.delete(["A", "B", "missing", "C"]).is_err());
    assert_eq!(Value::Object(ctx.get_all().clone()), json!({"C": 3}));
}

#[test]
fn delete_many() {
    let mut ctx = Context::new();
    ctx.set("A", "string").unwrap();
    ctx.set("B", 10).unwrap();
    ctx.set("C", true).unwrap();
    ctx.delete(["A", "C"]).unwrap();
    assert_eq!(Value::Object(ctx.get_all().clone()), json!({"B": 10}));
}

#[test]
fn get_all_with_filter() {
    let mut ctx = Context::new();
    ctx.set("A", "string").unwrap();
    ctx.set("B", 10).unwrap();
    ctx.set("C", true).unwrap();
    let ints = Transform::any(|all| match all {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| v.is_i64()).collect()),
        other => other,
    });
    assert_eq!(ctx.get_all_with(&ints).unwrap(), json!({"B": 10}));
}

#[test]
fn when_then_guarded_update() {
    let mut ctx = Context::new();
    ctx.set("attempts", 1).unwrap();
    let retrying = Predicate::new(|c| c.get("attempts").ok().and_then(Value::as_i64).unwrap_or(0) > 0);
    assert_eq!(ctx.when(&retrying).unwrap().update("attempts", 2).unwrap(), Some(()));
    assert_eq!(ctx.get("attempts").unwrap(), &json!(2));
}

#[test]
fn guard_run_combinator() {
    let mut ctx = Context::new();
    let out = ctx
        .if_not_has("seen")
        .run(|c| {
            c.set("seen", true)?;
            Ok(c.len())
        })
        .unwrap();
    assert_eq!(out, Some(1));
    let skipped = ctx.if_not_has("seen").run(|c| c.set("seen", false)).unwrap();
    assert_eq!(skipped, None);
    assert_eq!(ctx.get("seen").unwrap(), &json!(true));
}
