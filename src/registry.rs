use crate::context::Context;
use crate::errors::{Diagnostic, Error, Result};
use crate::validators::key;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Saved contexts by name, so a message can reference `{[name]key}`.
///
/// The registry owns every context saved into it.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    inner: HashMap<String, Context>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a context under a new name. Fails with `DuplicateName` when the
    /// name is taken; use [`Registry::update`] to replace it.
    #[track_caller]
    pub fn save(&mut self, name: &str, context: Context) -> Result<()> {
        key::ensure_name_syntax(name)?;
        if self.has(name) {
            return Err(Error::DuplicateName(Diagnostic::new(
                "invalid context name",
                name,
                "the context \"{name}\" was already saved",
                &[("name", Value::String(name.to_string()))],
            )));
        }
        debug!(name, entries = context.len(), "context saved");
        self.inner.insert(name.to_string(), context);
        Ok(())
    }

    /// Replace a saved context.
    #[track_caller]
    pub fn update(&mut self, name: &str, context: Context) -> Result<()> {
        self.ensure_saved(name)?;
        debug!(name, entries = context.len(), "context replaced");
        self.inner.insert(name.to_string(), context);
        Ok(())
    }

    /// Remove a saved context and hand it back.
    #[track_caller]
    pub fn delete(&mut self, name: &str) -> Result<Context> {
        self.ensure_saved(name)?;
        debug!(name, "context deleted");
        match self.inner.remove(name) {
            Some(context) => Ok(context),
            None => Err(missing(name)),
        }
    }

    #[track_caller]
    pub fn get(&self, name: &str) -> Result<&Context> {
        match self.inner.get(name) {
            Some(context) => Ok(context),
            None => Err(missing(name)),
        }
    }

    #[track_caller]
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Context> {
        match self.inner.get_mut(name) {
            Some(context) => Ok(context),
            None => Err(missing(name)),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[track_caller]
    fn ensure_saved(&self, name: &str) -> Result<()> {
        if self.has(name) {
            Ok(())
        } else {
            Err(missing(name))
        }
    }
}

#[track_caller]
fn missing(name: &str) -> Error {
    Error::MissingName(Diagnostic::new(
        "missing context name",
        name,
        "the context \"{name}\" was not defined",
        &[("name", Value::String(name.to_string()))],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn with_key(value: i64) -> Context {
        let mut ctx = Context::new();
        ctx.set("key", value).unwrap();
        ctx
    }

    #[test]
    fn save_once_then_update() {
        let mut registry = Registry::new();
        registry.save("A", with_key(1)).unwrap();
        assert!(matches!(registry.save("A", with_key(2)), Err(Error::DuplicateName(_))));
        registry.update("A", with_key(3)).unwrap();
        assert_eq!(registry.get("A").unwrap().get("key").unwrap(), &json!(3));
    }

    #[test]
    fn missing_names_fail() {
        let mut registry = Registry::new();
        assert!(matches!(registry.update("A", Context::new()), Err(Error::MissingName(_))));
        assert!(matches!(registry.delete("A"), Err(Error::MissingName(_))));
        let err = registry.get("A").unwrap_err();
        assert_eq!(err.diagnostic().unwrap().message, "the context \"A\" was not defined");
    }

    #[test]
    fn delete_returns_the_context() {
        let mut registry = Registry::new();
        registry.save("A", with_key(1)).unwrap();
        let ctx = registry.delete("A").unwrap();
        assert_eq!(ctx.get("key").unwrap(), &json!(1));
        assert!(!registry.has("A"));
        assert!(registry.is_empty());
    }

    #[test]
    fn get_mut_shares_the_saved_instance() {
        let mut registry = Registry::new();
        registry.save("A", with_key(1)).unwrap();
        registry.get_mut("A").unwrap().force_set("key", 5);
        assert_eq!(registry.get("A").unwrap().get("key").unwrap(), &json!(5));
    }

    #[test]
    fn bracketed_names_are_refused() {
        let mut registry = Registry::new();
        assert!(matches!(registry.save("[A]", Context::new()), Err(Error::InvalidName(_))));
    }
}
