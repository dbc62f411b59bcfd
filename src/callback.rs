use crate::context::Context;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Declared type of a callback parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Any,
    Null,
    Bool,
    Int,
    Float,
    String,
    Array,
    Object,
    Context,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Any => "any",
            Type::Null => "null",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::String => "string",
            Type::Array => "array",
            Type::Object => "object",
            Type::Context => "Context",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Empty when the parameter is untyped, more than one entry for a union.
    pub types: Vec<Type>,
}

/// What a callback claims to accept and return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
    /// Empty when no return type is declared, more than one entry for a union.
    pub returns: Vec<Type>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(self, name: &str, ty: Type) -> Self {
        self.param_union(name, [ty])
    }

    pub fn untyped_param(mut self, name: &str) -> Self {
        self.params.push(Param { name: name.to_string(), types: Vec::new() });
        self
    }

    pub fn param_union(mut self, name: &str, types: impl IntoIterator<Item = Type>) -> Self {
        self.params.push(Param { name: name.to_string(), types: types.into_iter().collect() });
        self
    }

    pub fn returns(self, ty: Type) -> Self {
        self.returns_union([ty])
    }

    pub fn returns_union(mut self, types: impl IntoIterator<Item = Type>) -> Self {
        self.returns.extend(types);
        self
    }

    /// `fn(value: any) -> any`
    pub fn any() -> Self {
        Self::new().param("value", Type::Any).returns(Type::Any)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |types: &[Type]| types.iter().map(Type::to_string).collect::<Vec<_>>().join("|");
        let params = self
            .params
            .iter()
            .map(|p| {
                if p.types.is_empty() {
                    p.name.clone()
                } else {
                    format!("{}: {}", p.name, join(&p.types))
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "fn({params})")?;
        if !self.returns.is_empty() {
            write!(f, " -> {}", join(&self.returns))?;
        }
        Ok(())
    }
}

/// A value transform handed to `clear`, `get`, `get_all` or `format`.
#[derive(Clone)]
pub struct Transform {
    signature: Signature,
    func: Rc<dyn Fn(Value) -> Value>,
}

impl Transform {
    /// A transform declared as `fn(value: any) -> any`.
    pub fn any<F>(func: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        Self::declared(Signature::any(), func)
    }

    pub fn declared<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        Self { signature, func: Rc::new(func) }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, value: Value) -> Value {
        (self.func)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("signature", &self.signature).finish()
    }
}

/// A gate condition for [`Context::when`]. Non-boolean results count as `false`.
#[derive(Clone)]
pub struct Predicate {
    signature: Signature,
    func: Rc<dyn Fn(&Context) -> Value>,
}

impl Predicate {
    /// A predicate declared as `fn(context: Context) -> bool`.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Context) -> bool + 'static,
    {
        let signature = Signature::new().param("context", Type::Context).returns(Type::Bool);
        Self::declared(signature, move |ctx| Value::Bool(func(ctx)))
    }

    pub fn declared<F>(signature: Signature, func: F) -> Self
    where
        F: Fn(&Context) -> Value + 'static,
    {
        Self { signature, func: Rc::new(func) }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, ctx: &Context) -> bool {
        (self.func)(ctx).as_bool().unwrap_or(false)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("signature", &self.signature).finish()
    }
}
