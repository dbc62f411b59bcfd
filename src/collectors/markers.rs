use once_cell::sync::Lazy;
use regex::Regex;

/// `{...}` with no nested or stray braces inside.
pub(crate) static MARKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Finds the `{marker}` placeholders of a template.
pub struct TemplateMarkersCollector<'a> {
    template: &'a str,
}

impl<'a> TemplateMarkersCollector<'a> {
    pub fn new(template: &'a str) -> Self {
        Self { template }
    }

    /// Marker texts without their braces, left to right, duplicates kept.
    pub fn collect(&self) -> Vec<&'a str> {
        MARKER_PATTERN
            .captures_iter(self.template)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(template: &str) -> Vec<&str> {
        TemplateMarkersCollector::new(template).collect()
    }

    #[test]
    fn collects_in_order() {
        assert_eq!(collect("{[A]key}, {key}"), vec!["[A]key", "key"]);
    }

    #[test]
    fn keeps_duplicates() {
        assert_eq!(collect("{a}-{b}-{a}"), vec!["a", "b", "a"]);
    }

    #[test]
    fn ignores_malformed_regions() {
        assert_eq!(collect("{} {unterminated"), Vec::<&str>::new());
        assert_eq!(collect("{{inner}}"), vec!["inner"]);
        assert_eq!(collect("{a{b}"), vec!["b"]);
        assert_eq!(collect("no markers"), Vec::<&str>::new());
    }
}
