use crate::context::Context;
use crate::errors::{Diagnostic, Error, Result};
use serde_json::Value;

const RESERVED: [char; 4] = ['{', '}', '[', ']'];

/// The key must not be stored yet.
#[track_caller]
pub fn ensure_unused(ctx: &Context, key: &str) -> Result<()> {
    if ctx.has(key) {
        return Err(Error::DuplicateKey(Diagnostic::new(
            "invalid context key",
            key,
            "the key \"{key}\" was already used to set a context value",
            &[("key", Value::String(key.to_string()))],
        )));
    }
    Ok(())
}

/// The key must already be stored.
#[track_caller]
pub fn ensure_defined(ctx: &Context, key: &str) -> Result<()> {
    if !ctx.has(key) {
        return Err(Error::MissingKey(Diagnostic::new(
            "missing context key",
            key,
            "the context key \"{key}\" was not defined",
            &[("key", Value::String(key.to_string()))],
        )));
    }
    Ok(())
}

/// Registry names end up inside markers, so they cannot carry braces or brackets.
#[track_caller]
pub fn ensure_name_syntax(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(RESERVED) {
        return Err(Error::InvalidName(Diagnostic::new(
            "invalid name syntax",
            name,
            "the name \"{name}\" is invalid, names must be non-empty and cannot contain \"{}\" or \"[]\"",
            &[("name", Value::String(name.to_string()))],
        )));
    }
    Ok(())
}
