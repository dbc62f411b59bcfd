//! Human-readable reports built from an [`Exception`](crate::Exception).

mod html;
mod text;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

use crate::call_site::CallSite;
use crate::errors::{Error, Result};
use serde::Serialize;
use tracing::warn;

/// Everything a renderer needs to describe one exception.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub code: i64,
    pub possible_causes: Vec<String>,
    pub origin_location: CallSite,
    pub code_snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_code_snippet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// When false nothing is rendered at all.
    pub enabled: bool,
    /// Source lines shown on each side of the reported line.
    pub snippet_radius: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { enabled: true, snippet_radius: 5 }
    }
}

pub trait ReportRenderer {
    fn render(&self, record: &ErrorRecord) -> Result<String>;
}

/// Pretty-printed JSON of the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, record: &ErrorRecord) -> Result<String> {
        serde_json::to_string_pretty(record).map_err(|e| Error::Render(e.to_string()))
    }
}

/// Numbered source lines around `site`, the reported line marked with `>`.
/// An unreadable file gives an empty snippet.
pub fn code_snippet(site: &CallSite, radius: usize) -> String {
    let source = match std::fs::read_to_string(&site.file) {
        Ok(source) => source,
        Err(e) => {
            warn!(file = %site.file, error = %e, "source file unavailable for snippet");
            return String::new();
        }
    };
    let target = site.line as usize;
    let first = target.saturating_sub(radius).max(1);
    let last = target.saturating_add(radius);
    let width = last.to_string().len();

    source
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, text))
        .filter(|(n, _)| (first..=last).contains(n))
        .map(|(n, text)| {
            let mark = if n == target { '>' } else { ' ' };
            format!("{mark} {n:>width$} | {text}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
