//! Marker extraction and resolution for message templates.

pub mod context;
pub mod markers;

pub use context::{ContextCollector, Marker};
pub use markers::TemplateMarkersCollector;
