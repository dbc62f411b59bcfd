pub mod errors;
pub mod call_site;
pub mod callback;
pub mod context;
pub mod registry;
pub mod scope;
pub mod collectors;
pub mod validators;
pub mod prepare;
pub mod exception;
pub mod export;
pub mod report;
mod parser;

pub use call_site::CallSite;
pub use callback::{Predicate, Signature, Transform, Type};
pub use context::{Context, Guard};
pub use errors::{CallbackError, Diagnostic, Error, Result};
pub use exception::Exception;
pub use export::{export, stringify};
pub use prepare::MessagePreparer;
pub use registry::Registry;
pub use scope::Scope;
