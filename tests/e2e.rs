use exception_context as exc;
use exc::{Context, Error, Exception, Registry, Scope};
use pretty_assertions::assert_eq;
use serde_json::json;

fn saved_and_current() -> (Context, Registry) {
    let mut saved = Context::new();
    saved.set("key", 1).unwrap();
    let mut registry = Registry::new();
    registry.save("A", saved).unwrap();

    let mut current = Context::new();
    current.set("key", 2).unwrap();
    (current, registry)
}

#[test]
fn test_example_both_bracket_placements() {
    let (current, registry) = saved_and_current();
    let e = Exception::new("{[A]key}{key}{key[A]}", &current, &registry).unwrap();
    assert_eq!(e.message(), "121");
}

#[test]
fn test_example_scope_flow() {
    let mut scope = Scope::new();
    scope.context_mut().set("key", 1).unwrap();
    scope.archive("A").unwrap();
    scope.context_mut().set("key", 2).unwrap();

    let e = scope.exception("{[A]key}{key}{key[A]}").unwrap();
    assert_eq!(e.to_string(), "121");
}

#[test]
fn test_example_non_string_values_are_exported() {
    let mut current = Context::new();
    current.set("ok", true).unwrap();
    current.set("ids", json!([3, 4])).unwrap();
    current.set("nothing", json!(null)).unwrap();
    let registry = Registry::new();

    let e = Exception::new("ok={ok} nothing={nothing} ids={ids}", &current, &registry).unwrap();
    assert_eq!(e.message(), "ok=true nothing=NULL ids=array (\n  0 => 3,\n  1 => 4,\n)");
}

#[test]
fn test_example_repeated_marker_resolves_identically() {
    let mut current = Context::new();
    current.set("user", "ana").unwrap();
    let registry = Registry::new();

    let e = Exception::new("{user} / {user} / {user}", &current, &registry).unwrap();
    assert_eq!(e.message(), "ana / ana / ana");
}

#[test]
fn test_example_loop_with_force_set() {
    let mut current = Context::new();
    let registry = Registry::new();
    let mut last = None;
    for row in 1..=3 {
        current.force_set("row", row);
        last = Some(Exception::new("failed at row {row}", &current, &registry).unwrap());
    }
    assert_eq!(last.unwrap().message(), "failed at row 3");
}

#[test]
fn test_example_missing_name_aborts() {
    let (current, registry) = saved_and_current();
    let err = Exception::new("{[B]key}", &current, &registry).unwrap_err();
    match err {
        Error::MessagePreparation { source, .. } => {
            let diag = source.diagnostic().unwrap();
            assert_eq!(diag.kind, "missing context name");
            assert_eq!(diag.subject, "B");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_example_invalid_marker_aborts() {
    let (current, registry) = saved_and_current();
    let err = Exception::new("{[A]key[A]}", &current, &registry).unwrap_err();
    assert!(matches!(err, Error::MessagePreparation { ref source, .. } if matches!(**source, Error::InvalidMarker(_))));
}

#[test]
fn test_example_diagnostics_point_at_caller() {
    let mut current = Context::new();
    current.set("key", 1).unwrap();
    let line = line!() + 1;
    let err = current.set("key", 2).unwrap_err();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.site.line, line);
    assert!(diag.site.file.ends_with("e2e.rs"));
    assert_eq!(diag.message, "the key \"key\" was already used to set a context value");
    assert!(err.to_string().starts_with("error - invalid context key: the key \"key\""));
}
