use exception_context as exc;
use exc::report::{HtmlRenderer, JsonRenderer, ReportOptions, TextRenderer};
use exc::{CallSite, Context, Exception, Registry};
use pretty_assertions::assert_eq;

fn exception() -> Exception {
    let mut current = Context::new();
    current.set("id", 7).unwrap();
    let registry = Registry::new();
    Exception::new("order {id} failed", &current, &registry)
        .unwrap()
        .with_type("Order error")
        .with_code(100)
        .add_possible_cause("payment declined")
}

#[test]
fn record_captures_construction_site() {
    let line = line!() + 3;
    let mut current = Context::new();
    let registry = Registry::new();
    let e = Exception::new("here", &current, &registry).unwrap();
    current.force_set("unused", true);

    let record = e.record(&ReportOptions { enabled: true, snippet_radius: 0 });
    assert!(record.origin_location.file.ends_with("report.rs"));
    assert_eq!(record.origin_location.line, line);
    assert!(record.code_snippet.starts_with('>'));
    assert!(record.code_snippet.contains("Exception::new(\"here\""));
    assert_eq!(record.origin_code_snippet, None);
}

#[test]
fn origin_snippet_is_included_when_set() {
    let origin = CallSite::new(file!(), 1);
    let e = exception().originated_at(origin);
    let record = e.record(&ReportOptions::default());
    let snippet = record.origin_code_snippet.unwrap();
    assert!(snippet.starts_with("> 1 | use exception_context as exc;"));
}

#[test]
fn renders_all_formats() {
    let e = exception();
    let opts = ReportOptions::default();

    let text = e.report(&TextRenderer, &opts).unwrap().unwrap();
    assert!(text.starts_with("error - Order error: order 7 failed\n  code: 100"));

    let html = e.report(&HtmlRenderer, &opts).unwrap().unwrap();
    assert!(html.contains("<p>order 7 failed</p>"));
    assert!(html.contains("<li>payment declined</li>"));

    let json = e.report(&JsonRenderer, &opts).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "Order error");
    assert_eq!(value["possibleCauses"][0], "payment declined");
}

#[test]
fn hidden_reports() {
    let opts = ReportOptions { enabled: false, snippet_radius: 5 };
    assert_eq!(exception().report(&HtmlRenderer, &opts).unwrap(), None);
}
