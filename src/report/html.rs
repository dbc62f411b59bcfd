use super::{ErrorRecord, ReportRenderer};
use crate::errors::{Error, Result};
use std::fmt::Write;

const STYLE: &str = "\
* { margin: 0; padding: 0; box-sizing: border-box; }
.container { width: 100%; padding: 50px; }
.exception { background-color: #3c2173; color: #ffffff; padding: 25px; border-radius: 10px; }
.exception header { text-align: center; font-size: 1.5rem; border-bottom: 1px solid #ffffff; }
.content { width: 80%; margin: 0 auto; padding-top: 30px; }
.data { list-style-type: none; }
.data .key { font-weight: bold; margin-right: 5px; }
.section { margin-top: 30px; font-size: 1.1rem; }
.section > span { display: block; font-weight: bold; font-size: 1.3rem; margin-bottom: 10px; }
.code { background-color: #ffffff; color: #000000; border-radius: 10px; padding: 25px; overflow-x: auto; }
";

/// Standalone HTML error page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn render(&self, record: &ErrorRecord) -> Result<String> {
        page(record).map_err(|e| Error::Render(e.to_string()))
    }
}

fn page(record: &ErrorRecord) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"UTF-8\">")?;
    writeln!(out, "<title>An error occurred</title>")?;
    writeln!(out, "<style>\n{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<section class=\"container\"><div class=\"exception\">")?;
    writeln!(out, "<header><h3>An error occurred: {}</h3></header>", escape(&record.kind))?;
    writeln!(out, "<div class=\"content\">")?;

    let location = &record.origin_location;
    let mut data = vec![
        ("code", record.code.to_string()),
        ("file", location.file.clone()),
        ("line", location.line.to_string()),
    ];
    if let Some(class) = &location.class {
        data.push(("class", class.clone()));
    }
    if let Some(method) = &location.method {
        data.push(("method", method.clone()));
    }
    writeln!(out, "<ul class=\"data\">")?;
    for (key, value) in data {
        writeln!(
            out,
            "<li><span class=\"key\">{key}:</span><span>{}</span></li>",
            escape(&value)
        )?;
    }
    writeln!(out, "</ul>")?;

    writeln!(out, "<div class=\"section\"><span>Error message:</span><p>{}</p></div>", escape(&record.message))?;

    if !record.possible_causes.is_empty() {
        writeln!(out, "<div class=\"section\"><span>Possible causes:</span><ul>")?;
        for cause in &record.possible_causes {
            writeln!(out, "<li>{}</li>", escape(cause))?;
        }
        writeln!(out, "</ul></div>")?;
    }

    snippet(&mut out, "Code where the error occurred:", &record.code_snippet)?;
    if let Some(origin) = &record.origin_code_snippet {
        snippet(&mut out, "Code where the error originated:", origin)?;
    }

    writeln!(out, "</div>")?;
    writeln!(out, "</div></section>")?;
    writeln!(out, "</body>")?;
    write!(out, "</html>")?;
    Ok(out)
}

fn snippet(out: &mut String, title: &str, code: &str) -> std::fmt::Result {
    writeln!(
        out,
        "<div class=\"section\"><span>{title}</span><div class=\"code\"><pre><code>{}</code></pre></div></div>",
        escape(code)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_site::CallSite;

    #[test]
    fn renders_escaped_fields() {
        let record = ErrorRecord {
            kind: "Import <failed>".into(),
            message: "row \"7\" & more".into(),
            code: 100,
            possible_causes: vec!["missing column".into()],
            origin_location: CallSite::new("src/import.rs", 42).in_method("Importer", "run"),
            code_snippet: "> 42 | if a < b {".into(),
            origin_code_snippet: None,
        };
        let html = HtmlRenderer.render(&record).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("An error occurred: Import &lt;failed&gt;"));
        assert!(html.contains("row &quot;7&quot; &amp; more"));
        assert!(html.contains("<li>missing column</li>"));
        assert!(html.contains("<span>Importer</span>"));
        assert!(html.contains("&gt; 42 | if a &lt; b {"));
        assert!(!html.contains("originated"));
    }
}
