use crate::call_site::CallSite;
use crate::context::Context;
use crate::errors::Result;
use crate::prepare::MessagePreparer;
use crate::registry::Registry;
use crate::report::{code_snippet, ErrorRecord, ReportOptions, ReportRenderer};
use std::error::Error as StdError;
use std::fmt;

type Source = Box<dyn StdError + Send + Sync + 'static>;

/// An error whose message was built from a template at construction time.
///
/// ```
/// use exception_context::{Context, Exception, Registry};
///
/// let mut saved = Context::new();
/// saved.set("key", 1).unwrap();
/// let mut registry = Registry::new();
/// registry.save("A", saved).unwrap();
///
/// let mut current = Context::new();
/// current.set("key", 2).unwrap();
///
/// let e = Exception::new("{[A]key}{key}{key[A]}", &current, &registry).unwrap();
/// assert_eq!(e.message(), "121");
/// ```
#[derive(Debug)]
pub struct Exception {
    kind: String,
    message: String,
    code: i64,
    possible_causes: Vec<String>,
    location: CallSite,
    origin: Option<CallSite>,
    source: Option<Source>,
}

impl Exception {
    /// Prepare `template` against `current` and the saved contexts of
    /// `registry`. Fails with `MessagePreparation` when a marker cannot be
    /// resolved.
    #[track_caller]
    pub fn new(template: &str, current: &Context, registry: &Registry) -> Result<Self> {
        let message = MessagePreparer::new(current, registry).prepare(template)?;
        Ok(Self {
            kind: "Undefined".to_string(),
            message,
            code: 0,
            possible_causes: Vec::new(),
            location: CallSite::capture(),
            origin: None,
            source: None,
        })
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn add_possible_cause(mut self, cause: impl Into<String>) -> Self {
        self.possible_causes.push(cause.into());
        self
    }

    /// Name the class and method the exception was raised from.
    pub fn in_method(mut self, class: impl Into<String>, method: impl Into<String>) -> Self {
        self.location = self.location.in_method(class, method);
        self
    }

    /// Where the failing operation was started, when that differs from
    /// where the exception is built.
    pub fn originated_at(mut self, origin: CallSite) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn possible_causes(&self) -> &[String] {
        &self.possible_causes
    }

    pub fn location(&self) -> &CallSite {
        &self.location
    }

    pub fn origin(&self) -> Option<&CallSite> {
        self.origin.as_ref()
    }

    pub fn record(&self, opts: &ReportOptions) -> ErrorRecord {
        ErrorRecord {
            kind: self.kind.clone(),
            message: self.message.clone(),
            code: self.code,
            possible_causes: self.possible_causes.clone(),
            origin_location: self.location.clone(),
            code_snippet: code_snippet(&self.location, opts.snippet_radius),
            origin_code_snippet: self
                .origin
                .as_ref()
                .map(|origin| code_snippet(origin, opts.snippet_radius)),
        }
    }

    /// Render a report, or nothing when reports are disabled.
    pub fn report(&self, renderer: &dyn ReportRenderer, opts: &ReportOptions) -> Result<Option<String>> {
        if !opts.enabled {
            return Ok(None);
        }
        renderer.render(&self.record(opts)).map(Some)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Exception {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}
