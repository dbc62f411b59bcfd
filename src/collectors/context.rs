use crate::context::Context;
use crate::errors::{Diagnostic, Error, Result};
use crate::export::stringify;
use crate::parser::{ParseError, Parser};
use crate::registry::Registry;
use serde_json::Value;
use tracing::trace;

const RESERVED: [char; 4] = ['{', '}', '[', ']'];

/// A parsed marker: `key`, `[name]key` or `key[name]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Registry name of the saved context to read from, if any.
    pub name: Option<&'a str>,
    pub key: &'a str,
}

impl<'a> Marker<'a> {
    #[track_caller]
    pub fn parse(text: &'a str) -> Result<Self> {
        match parse_marker(text) {
            Ok(marker) => Ok(marker),
            Err(ParseError::InvalidSyntax(reason)) => Err(Error::InvalidMarker(Diagnostic::new(
                "invalid marker",
                text,
                "the marker \"{marker}\" is invalid: {reason}",
                &[("marker", Value::String(text.to_string())), ("reason", Value::String(reason))],
            ))),
        }
    }
}

fn parse_marker(text: &str) -> std::result::Result<Marker<'_>, ParseError> {
    let mut p = Parser::new(text);
    let mut name = None;
    if p.consume_char('[') {
        name = Some(bracket_name(&mut p)?);
    }
    let key = p.take_while(|c| !RESERVED.contains(&c));
    if key.is_empty() {
        return Err(ParseError::InvalidSyntax("missing key".into()));
    }
    if name.is_none() && p.consume_char('[') {
        name = Some(bracket_name(&mut p)?);
    }
    if !p.eof() {
        return Err(ParseError::InvalidSyntax(format!("unexpected \"{}\"", p.rest())));
    }
    Ok(Marker { name, key })
}

fn bracket_name<'a>(p: &mut Parser<'a>) -> std::result::Result<&'a str, ParseError> {
    let name = p.capture_until(']')?;
    p.expect(']')?;
    if name.is_empty() || name.contains(RESERVED) {
        return Err(ParseError::InvalidSyntax("bad context name".into()));
    }
    Ok(name)
}

/// Resolves markers against the current context and the saved contexts.
pub struct ContextCollector<'a> {
    current: &'a Context,
    /// `None` refuses named markers, which keeps diagnostics self-contained.
    registry: Option<&'a Registry>,
}

impl<'a> ContextCollector<'a> {
    pub fn new(current: &'a Context, registry: &'a Registry) -> Self {
        Self { current, registry: Some(registry) }
    }

    /// A collector that only reads `current`.
    pub fn literal(current: &'a Context) -> Self {
        Self { current, registry: None }
    }

    /// The raw value a marker points at.
    #[track_caller]
    pub fn resolve(&self, marker: &str) -> Result<&'a Value> {
        let parsed = Marker::parse(marker)?;
        let source = match (parsed.name, self.registry) {
            (None, _) => self.current,
            (Some(name), Some(registry)) => registry.get(name)?,
            (Some(name), None) => {
                return Err(Error::InvalidMarker(Diagnostic::new(
                    "invalid marker",
                    marker,
                    "the marker \"{marker}\" references the context \"{name}\" where no saved contexts are available",
                    &[
                        ("marker", Value::String(marker.to_string())),
                        ("name", Value::String(name.to_string())),
                    ],
                )))
            }
        };
        let value = source.get(parsed.key)?;
        trace!(marker, "marker resolved");
        Ok(value)
    }

    /// The text a marker is replaced with.
    #[track_caller]
    pub fn collect(&self, marker: &str) -> Result<String> {
        self.resolve(marker).map(stringify)
    }
}
