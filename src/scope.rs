use crate::context::Context;
use crate::errors::Result;
use crate::exception::Exception;
use crate::registry::Registry;
use tracing::debug;

/// The current context plus the saved ones, held by the outermost layer of
/// an application and passed down explicitly.
#[derive(Debug, Default)]
pub struct Scope {
    current: Option<Context>,
    registry: Registry,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current context, created on first use.
    pub fn context_mut(&mut self) -> &mut Context {
        self.current.get_or_insert_with(Context::new)
    }

    /// The current context, created on first use.
    pub fn context(&mut self) -> &Context {
        self.context_mut()
    }

    /// Drop the current context and start from an empty one.
    pub fn new_context(&mut self) {
        self.current = None;
    }

    /// Save the current context under `name` and start a new one. On failure
    /// the current context is left in place.
    #[track_caller]
    pub fn archive(&mut self, name: &str) -> Result<()> {
        let current = self.current.take().unwrap_or_default();
        if let Err(e) = self.registry.save(name, current.clone()) {
            self.current = Some(current);
            return Err(e);
        }
        debug!(name, "current context archived");
        Ok(())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Build an exception against the current context and the registry.
    #[track_caller]
    pub fn exception(&mut self, template: &str) -> Result<Exception> {
        let current = self.current.get_or_insert_with(Context::new);
        Exception::new(template, current, &self.registry)
    }
}
