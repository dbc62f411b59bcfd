use super::{ErrorRecord, ReportRenderer};
use crate::errors::Result;

/// Plain text report for terminals and logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, record: &ErrorRecord) -> Result<String> {
        let mut lines = vec![
            format!("error - {}: {}", record.kind, record.message),
            format!("  code: {}", record.code),
            format!("  at: {}", record.origin_location),
        ];
        if !record.possible_causes.is_empty() {
            lines.push("  possible causes:".to_string());
            lines.extend(record.possible_causes.iter().map(|c| format!("    - {c}")));
        }
        if !record.code_snippet.is_empty() {
            lines.push(String::new());
            lines.push(record.code_snippet.clone());
        }
        if let Some(origin) = record.origin_code_snippet.as_deref().filter(|s| !s.is_empty()) {
            lines.push(String::new());
            lines.push("originated at:".to_string());
            lines.push(origin.to_string());
        }
        Ok(lines.join("\n"))
    }
}
