use serde::Serialize;
use std::fmt;
use std::panic::Location;

/// Source position of the public call that raised or created something.
///
/// Rust has no runtime class/method introspection, so `class` and `method`
/// stay empty unless the caller fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub file: String,
    pub line: u32,
    #[serde(skip)]
    pub column: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl CallSite {
    /// Capture the caller's location. Chains through every `#[track_caller]`
    /// frame, so the reported site is the first caller outside the crate's
    /// tracked API.
    #[track_caller]
    pub fn capture() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_string(),
            line: location.line(),
            column: location.column(),
            class: None,
            method: None,
        }
    }

    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self { file: file.into(), line, column: 0, class: None, method: None }
    }

    pub fn in_method(mut self, class: impl Into<String>, method: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self.method = Some(method.into());
        self
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if self.column > 0 {
            write!(f, ":{}", self.column)?;
        }
        match (&self.class, &self.method) {
            (Some(class), Some(method)) => write!(f, " in {class}::{method}"),
            (None, Some(method)) => write!(f, " in {method}"),
            _ => Ok(()),
        }
    }
}
