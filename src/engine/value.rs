use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::engine::error::EngineError;

/// Function signature for host-provided callables.
pub type NativeFn = fn(&[Value]) -> Result<Value, EngineError>;

/// A value that can be invoked with a positional argument list.
pub enum Callable {
    /// Direct function pointer - zero overhead for compiled-in functions.
    Native(NativeFn),
    /// Host- or plugin-provided closure - small vtable indirection cost.
    Boxed(Arc<dyn Fn(&[Value]) -> Result<Value, EngineError> + Send + Sync>),
}

impl Callable {
    /// Wrap a closure as a callable value.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, EngineError> + Send + Sync + 'static,
    {
        Callable::Boxed(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, EngineError> {
        match self {
            Callable::Native(f) => f(args),
            Callable::Boxed(f) => f(args),
        }
    }
}

impl Clone for Callable {
    fn clone(&self) -> Self {
        match self {
            Callable::Native(f) => Callable::Native(*f),
            Callable::Boxed(f) => Callable::Boxed(f.clone()),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => std::ptr::eq(*a as *const (), *b as *const ()),
            (Callable::Boxed(a), Callable::Boxed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "Callable::Native(..)"),
            Callable::Boxed(_) => write!(f, "Callable::Boxed(..)"),
        }
    }
}

/// Dynamic value held by a binding at any scope level.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Callable(Callable),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Callable(_) => "callable",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// A value satisfies a method lookup only if it supports invocation.
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(f) => Some(f),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Callable(_) => write!(f, "<callable>"),
        }
    }
}
