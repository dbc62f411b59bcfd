use crate::callback::{Predicate, Transform, Type};
use crate::errors::Result;
use crate::validators::{callback, key};
use serde_json::{Map, Value};
use tracing::trace;

/// Key/value data gathered during one unit of work, referenced later by
/// `{key}` markers in exception messages.
///
/// `set` refuses keys that are already stored, `update`, `get` and `delete`
/// refuse keys that are not. Entries keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct Context {
    entries: Map<String, Value>,
    /// Sticky formatter applied by [`Context::separate`].
    formatter: Option<Transform>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries, formatter: None }
    }

    /// Store a new key. Fails with `DuplicateKey` when the key is already set.
    #[track_caller]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        key::ensure_unused(self, &key)?;
        self.entries.insert(key, value.into());
        Ok(())
    }

    /// Store a key whether or not it exists. Useful for values rewritten on
    /// every iteration of a loop.
    pub fn force_set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Overwrite an existing key. Fails with `MissingKey` when it was never set.
    #[track_caller]
    pub fn update(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        key::ensure_defined(self, key)?;
        self.force_set(key, value);
        Ok(())
    }

    /// Remove keys in order. Stops at the first missing key; keys removed
    /// before it stay removed.
    #[track_caller]
    pub fn delete<I, K>(&mut self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        for k in keys {
            let k = k.as_ref();
            key::ensure_defined(self, k)?;
            self.entries.shift_remove(k);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the entries with whatever `transform` makes of them.
    ///
    /// An object result becomes the new entries, an array is keyed by index and
    /// any other value is kept as the single entry `"0"`.
    #[track_caller]
    pub fn clear_with(&mut self, transform: &Transform) -> Result<()> {
        callback::validate(transform.signature(), Type::Any, Type::Any)?;
        let all = Value::Object(std::mem::take(&mut self.entries));
        self.entries = into_entries(transform.call(all));
        Ok(())
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[track_caller]
    pub fn get(&self, key: &str) -> Result<&Value> {
        key::ensure_defined(self, key)?;
        // ensure_defined guarantees presence
        Ok(&self.entries[key])
    }

    #[track_caller]
    pub fn get_with(&self, key: &str, transform: &Transform) -> Result<Value> {
        let value = self.get(key)?;
        callback::validate(transform.signature(), Type::Any, Type::Any)?;
        Ok(transform.call(value.clone()))
    }

    /// Shared view of every entry.
    pub fn get_all(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Feed every entry to `transform`; a scalar result is wrapped as `[value]`.
    #[track_caller]
    pub fn get_all_with(&self, transform: &Transform) -> Result<Value> {
        callback::validate(transform.signature(), Type::Any, Type::Any)?;
        Ok(match transform.call(Value::Object(self.entries.clone())) {
            collection @ (Value::Object(_) | Value::Array(_)) => collection,
            scalar => Value::Array(vec![scalar]),
        })
    }

    /// Gate the next call on `key` being present.
    pub fn if_has(&mut self, key: &str) -> Guard<'_> {
        let authorized = self.has(key);
        Guard { ctx: self, authorized }
    }

    /// Gate the next call on `key` being absent.
    pub fn if_not_has(&mut self, key: &str) -> Guard<'_> {
        let authorized = !self.has(key);
        Guard { ctx: self, authorized }
    }

    /// Gate the next call on `predicate`, which must be declared as
    /// `fn(context: Context) -> bool`.
    #[track_caller]
    pub fn when(&mut self, predicate: &Predicate) -> Result<Guard<'_>> {
        callback::validate(predicate.signature(), Type::Context, Type::Bool)?;
        let authorized = predicate.call(self);
        Ok(Guard { ctx: self, authorized })
    }

    /// Values for `keys` in the order requested, each passed through the
    /// formatter set by [`Context::format`].
    #[track_caller]
    pub fn separate<I, K>(&self, keys: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut out = Vec::new();
        for k in keys {
            let value = self.get(k.as_ref())?.clone();
            out.push(match &self.formatter {
                Some(f) => f.call(value),
                None => value,
            });
        }
        Ok(out)
    }

    /// Set the formatter used by [`Context::separate`] until replaced.
    #[track_caller]
    pub fn format(&mut self, formatter: Transform) -> Result<&mut Self> {
        callback::validate(formatter.signature(), Type::Any, Type::Any)?;
        self.formatter = Some(formatter);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn into_entries(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        other => {
            let mut map = Map::new();
            map.insert("0".to_string(), other);
            map
        }
    }
}

/// One-shot gate returned by [`Context::if_has`], [`Context::if_not_has`] and
/// [`Context::when`].
///
/// Each operation consumes the guard, so exactly one call is gated. When the
/// gate is closed the call is skipped and returns `None`.
#[must_use = "a guard only gates the call made through it"]
pub struct Guard<'a> {
    ctx: &'a mut Context,
    authorized: bool,
}

impl<'a> Guard<'a> {
    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    /// Lookup that leaves the guard in place.
    pub fn has(&self, key: &str) -> bool {
        self.ctx.has(key)
    }

    fn open(self) -> Option<&'a mut Context> {
        if self.authorized {
            Some(self.ctx)
        } else {
            trace!("context gate closed, call skipped");
            None
        }
    }

    /// Gate an arbitrary operation on the context.
    pub fn run<T, F>(self, op: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Context) -> Result<T>,
    {
        match self.open() {
            Some(ctx) => op(ctx).map(Some),
            None => Ok(None),
        }
    }

    #[track_caller]
    pub fn set(self, key: impl Into<String>, value: impl Into<Value>) -> Result<Option<()>> {
        match self.open() {
            Some(ctx) => ctx.set(key, value).map(Some),
            None => Ok(None),
        }
    }

    pub fn force_set(self, key: impl Into<String>, value: impl Into<Value>) -> Option<()> {
        self.open().map(|ctx| ctx.force_set(key, value))
    }

    #[track_caller]
    pub fn update(self, key: &str, value: impl Into<Value>) -> Result<Option<()>> {
        match self.open() {
            Some(ctx) => ctx.update(key, value).map(Some),
            None => Ok(None),
        }
    }

    #[track_caller]
    pub fn delete<I, K>(self, keys: I) -> Result<Option<()>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        match self.open() {
            Some(ctx) => ctx.delete(keys).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(self) -> Option<()> {
        self.open().map(Context::clear)
    }

    #[track_caller]
    pub fn clear_with(self, transform: &Transform) -> Result<Option<()>> {
        match self.open() {
            Some(ctx) => ctx.clear_with(transform).map(Some),
            None => Ok(None),
        }
    }

    #[track_caller]
    pub fn get(self, key: &str) -> Result<Option<&'a Value>> {
        match self.open() {
            Some(ctx) => {
                let ctx: &'a Context = ctx;
                ctx.get(key).map(Some)
            }
            None => Ok(None),
        }
    }

    #[track_caller]
    pub fn get_with(self, key: &str, transform: &Transform) -> Result<Option<Value>> {
        match self.open() {
            Some(ctx) => ctx.get_with(key, transform).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_all(self) -> Option<&'a Map<String, Value>> {
        let ctx: &'a Context = self.open()?;
        Some(ctx.get_all())
    }

    #[track_caller]
    pub fn get_all_with(self, transform: &Transform) -> Result<Option<Value>> {
        match self.open() {
            Some(ctx) => ctx.get_all_with(transform).map(Some),
            None => Ok(None),
        }
    }

    #[track_caller]
    pub fn separate<I, K>(self, keys: I) -> Result<Option<Vec<Value>>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        match self.open() {
            Some(ctx) => ctx.separate(keys).map(Some),
            None => Ok(None),
        }
    }

    #[track_caller]
    pub fn format(self, formatter: Transform) -> Result<Option<&'a mut Context>> {
        match self.open() {
            Some(ctx) => ctx.format(formatter).map(Some),
            None => Ok(None),
        }
    }
}
