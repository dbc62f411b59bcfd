use serde_json::{Map, Number, Value};

/// Render a value in the export format used for marker substitution and
/// diagnostics: `NULL`, `true`/`false`, plain numbers, single-quoted strings
/// and `array ( key => value, )` blocks for collections. A nested collection
/// starts on its own line below its key, and object keys that are canonical
/// integers are written bare.
pub fn export(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, 0, &mut out);
    out
}

/// Text for a resolved marker: strings pass through untouched, everything
/// else goes through [`export`].
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => export(other),
    }
}

fn write_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&number(n)),
        Value::String(s) => quote(s, out),
        Value::Array(items) => {
            open(out);
            for (i, item) in items.iter().enumerate() {
                entry(&i.to_string(), item, depth, out);
            }
            close(depth, out);
        }
        Value::Object(map) => write_object(map, depth, out),
    }
}

fn write_object(map: &Map<String, Value>, depth: usize, out: &mut String) {
    open(out);
    for (key, item) in map {
        if is_integer_key(key) {
            entry(key, item, depth, out);
        } else {
            let mut quoted = String::new();
            quote(key, &mut quoted);
            entry(&quoted, item, depth, out);
        }
    }
    close(depth, out);
}

fn open(out: &mut String) {
    out.push_str("array (\n");
}

fn entry(key: &str, item: &Value, depth: usize, out: &mut String) {
    indent(depth + 1, out);
    out.push_str(key);
    out.push_str(" => ");
    if matches!(item, Value::Array(_) | Value::Object(_)) {
        out.push('\n');
        indent(depth + 1, out);
    }
    write_value(item, depth + 1, out);
    out.push_str(",\n");
}

fn close(depth: usize, out: &mut String) {
    indent(depth, out);
    out.push(')');
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

// "7" and "-3" count, "07", "+3" and "-0" stay strings.
fn is_integer_key(key: &str) -> bool {
    key.parse::<i64>().is_ok_and(|n| n.to_string() == key)
}

fn quote(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
}

// Floats keep a fractional part so `1.0` never reads back as an integer.
fn number(n: &Number) -> String {
    if n.is_f64() {
        let text = n.to_string();
        if text.contains(['.', 'e', 'E']) {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        n.to_string()
    }
}
