use crate::call_site::CallSite;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// A user-facing failure message together with where the API was misused.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Short label for the kind of failure, e.g. `missing context key`.
    pub kind: &'static str,
    /// The key, name or marker the failure is about.
    pub subject: String,
    pub message: String,
    pub site: CallSite,
}

impl Diagnostic {
    /// Build a diagnostic whose message is rendered from `template`, where each
    /// `{marker}` names one of `args`.
    #[track_caller]
    pub(crate) fn new(
        kind: &'static str,
        subject: impl Into<String>,
        template: &str,
        args: &[(&str, Value)],
    ) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: crate::prepare::render_diagnostic(template, args),
            site: CallSite::capture(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error - {}: {} (at {})", self.kind, self.message, self.site)
    }
}

/// A callback whose declared signature does not fit the call site, one
/// variant per violated clause.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("{0}")]
    MissingReturnType(Diagnostic),

    #[error("{0}")]
    MultipleReturnTypes(Diagnostic),

    #[error("{0}")]
    WrongReturnType(Diagnostic),

    #[error("{0}")]
    WrongParamCount(Diagnostic),

    #[error("{0}")]
    UntypedParam(Diagnostic),

    #[error("{0}")]
    MultipleParamTypes(Diagnostic),

    #[error("{0}")]
    WrongParamType(Diagnostic),
}

impl CallbackError {
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            CallbackError::MissingReturnType(d)
            | CallbackError::MultipleReturnTypes(d)
            | CallbackError::WrongReturnType(d)
            | CallbackError::WrongParamCount(d)
            | CallbackError::UntypedParam(d)
            | CallbackError::MultipleParamTypes(d)
            | CallbackError::WrongParamType(d) => d,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    DuplicateKey(Diagnostic),

    #[error("{0}")]
    MissingKey(Diagnostic),

    #[error("{0}")]
    DuplicateName(Diagnostic),

    #[error("{0}")]
    MissingName(Diagnostic),

    #[error("{0}")]
    InvalidName(Diagnostic),

    #[error("{0}")]
    InvalidMarker(Diagnostic),

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error("could not prepare message {template:?}")]
    MessagePreparation {
        template: String,
        #[source]
        source: Box<Error>,
    },

    #[error("render error: {0}")]
    Render(String),
}

impl Error {
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Error::DuplicateKey(d)
            | Error::MissingKey(d)
            | Error::DuplicateName(d)
            | Error::MissingName(d)
            | Error::InvalidName(d)
            | Error::InvalidMarker(d) => Some(d),
            Error::Callback(e) => Some(e.diagnostic()),
            Error::MessagePreparation { .. } | Error::Render(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
