//! Host value model
//!
//! `Value` is the dynamic value type the engine stores in data slots and
//! passes through accessors and methods. Function and object values are
//! `Arc`-shared and compare by identity; primitives compare structurally.
//! Descriptor equivalence, and therefore the whole composition algebra,
//! is built on top of this equality.

use std::fmt;
use std::sync::Arc;

use crate::error::TraitResult;
use crate::object::Instance;

/// A native method body. Receives the instance the method was invoked on
/// and the call arguments.
pub type NativeFn = Arc<dyn Fn(&Instance, &[Value]) -> TraitResult<Value> + Send + Sync>;

/// An accessor getter. Receives the instance the property was read from.
pub type Getter = Arc<dyn Fn(&Instance) -> TraitResult<Value> + Send + Sync>;

/// An accessor setter. Receives the instance and the value being written.
pub type Setter = Arc<dyn Fn(&Instance, Value) -> TraitResult<()> + Send + Sync>;

/// A dynamic host value.
#[derive(Clone, Default)]
pub enum Value {
    /// Empty value
    #[default]
    Unit,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Shared string
    Str(Arc<str>),
    /// Callable value, shared and compared by identity
    Fn(NativeFn),
    /// Reference to a created object, compared by identity
    Object(Arc<Instance>),
}

impl Value {
    /// Wrap a closure as a callable value.
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> TraitResult<Value> + Send + Sync + 'static,
    {
        Value::Fn(Arc::new(f))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Fn(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<Instance>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Fn(a), Value::Fn(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Fn(_) => write!(f, "Fn(<native>)"),
            Value::Object(_) => write!(f, "Object(<instance>)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Fn(_) => write!(f, "<fn>"),
            Value::Object(_) => write!(f, "<object>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<Instance>> for Value {
    fn from(o: Arc<Instance>) -> Self {
        Value::Object(o)
    }
}
