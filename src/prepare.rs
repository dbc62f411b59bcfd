use crate::collectors::markers::MARKER_PATTERN;
use crate::collectors::{ContextCollector, TemplateMarkersCollector};
use crate::context::Context;
use crate::errors::{Error, Result};
use crate::registry::Registry;
use itertools::Itertools;
use regex::Captures;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Turns a message template into its final text by replacing every
/// `{marker}` with the value it references.
pub struct MessagePreparer<'a> {
    collector: ContextCollector<'a>,
}

impl<'a> MessagePreparer<'a> {
    pub fn new(current: &'a Context, registry: &'a Registry) -> Self {
        Self { collector: ContextCollector::new(current, registry) }
    }

    /// A preparer that only reads `current` and refuses `[name]` markers.
    pub fn literal(current: &'a Context) -> Self {
        Self { collector: ContextCollector::literal(current) }
    }

    /// Resolve every distinct marker once, then substitute all of them in a
    /// single pass over the original template. Resolved text is never scanned
    /// for further markers.
    #[track_caller]
    pub fn prepare(&self, template: &str) -> Result<String> {
        let markers = TemplateMarkersCollector::new(template).collect();
        let mut resolved: HashMap<&str, String> = HashMap::new();
        for marker in markers.iter().copied().unique() {
            let text = self.collector.collect(marker).map_err(|source| Error::MessagePreparation {
                template: template.to_string(),
                source: Box::new(source),
            })?;
            resolved.insert(marker, text);
        }

        let message = MARKER_PATTERN.replace_all(template, |caps: &Captures<'_>| match resolved.get(&caps[1]) {
            Some(text) => text.clone(),
            None => caps[0].to_string(),
        });
        debug!(markers = markers.len(), distinct = resolved.len(), "message prepared");
        Ok(message.into_owned())
    }
}

/// Render an internal diagnostic template from literal arguments.
///
/// Falls back to the raw template when rendering fails so that reporting an
/// error can never fail itself.
pub(crate) fn render_diagnostic(template: &str, args: &[(&str, Value)]) -> String {
    let entries: Map<String, Value> =
        args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
    let ctx = Context::from_map(entries);
    match MessagePreparer::literal(&ctx).prepare(template) {
        Ok(message) => message,
        Err(e) => {
            warn!(template, error = %e, "diagnostic template could not be rendered");
            template.to_string()
        }
    }
}
