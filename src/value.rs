//! Dynamic values flowing through a mock: call arguments, return values,
//! raised faults and the type descriptors used to compute defaults.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An exception raised by a mocked call, a behavior, or a base implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Fault {
    /// Exception kind, e.g. `InvalidOperation`.
    pub kind: String,
    pub message: String,
}

impl Fault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Flavour of an async-style result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwaitableKind {
    Task,
    ValueTask,
}

impl fmt::Display for AwaitableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwaitableKind::Task => write!(f, "Task"),
            AwaitableKind::ValueTask => write!(f, "ValueTask"),
        }
    }
}

/// Settled state of an awaitable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum AwaitableState {
    Completed(Box<Value>),
    Faulted(Fault),
}

/// An async-style result wrapping a plain value or a fault.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Awaitable {
    pub kind: AwaitableKind,
    pub state: AwaitableState,
}

impl Awaitable {
    pub fn completed(kind: AwaitableKind, value: Value) -> Self {
        Self {
            kind,
            state: AwaitableState::Completed(Box::new(value)),
        }
    }

    pub fn faulted(kind: AwaitableKind, fault: Fault) -> Self {
        Self {
            kind,
            state: AwaitableState::Faulted(fault),
        }
    }

    /// Resolves the awaitable the way awaiting it would.
    pub fn into_result(self) -> Result<Value, Fault> {
        match self.state {
            AwaitableState::Completed(value) => Ok(*value),
            AwaitableState::Faulted(fault) => Err(fault),
        }
    }
}

/// A value passed to or returned from a mocked method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Awaitable(Awaitable),
}

impl Value {
    pub fn as_awaitable(&self) -> Option<&Awaitable> {
        match self {
            Value::Awaitable(awaitable) => Some(awaitable),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Awaitable> for Value {
    fn from(value: Awaitable) -> Self {
        Value::Awaitable(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

/// JSON objects have no counterpart and are carried as their serialized text.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::Str(object.to_string()),
        }
    }
}

/// Declared type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Void,
    Bool,
    Int,
    Float,
    Str,
    List(Box<TypeDescriptor>),
    /// Any nullable reference type, identified by name.
    Named(String),
    Awaitable(AwaitableKind, Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn task(result: TypeDescriptor) -> Self {
        TypeDescriptor::Awaitable(AwaitableKind::Task, Box::new(result))
    }

    pub fn value_task(result: TypeDescriptor) -> Self {
        TypeDescriptor::Awaitable(AwaitableKind::ValueTask, Box::new(result))
    }

    pub fn is_awaitable(&self) -> bool {
        matches!(self, TypeDescriptor::Awaitable(..))
    }

    /// The "empty" default for this type: zero for value types, an empty list,
    /// a completed awaitable of the inner default, and null for everything else.
    pub fn default_value(&self) -> Value {
        match self {
            TypeDescriptor::Void | TypeDescriptor::Str | TypeDescriptor::Named(_) => Value::Null,
            TypeDescriptor::Bool => Value::Bool(false),
            TypeDescriptor::Int => Value::Int(0),
            TypeDescriptor::Float => Value::Float(0.0),
            TypeDescriptor::List(_) => Value::List(Vec::new()),
            TypeDescriptor::Awaitable(kind, inner) => {
                Value::Awaitable(Awaitable::completed(*kind, inner.default_value()))
            }
        }
    }

    /// Whether `value` can be stored where this type is declared without conversion.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeDescriptor::Void, Value::Null) => true,
            (TypeDescriptor::Void, _) => false,
            (TypeDescriptor::Bool, Value::Bool(_)) => true,
            (TypeDescriptor::Int, Value::Int(_)) => true,
            (TypeDescriptor::Float, Value::Float(_) | Value::Int(_)) => true,
            (TypeDescriptor::Str | TypeDescriptor::Named(_), Value::Null | Value::Str(_)) => true,
            (TypeDescriptor::List(inner), Value::List(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (TypeDescriptor::List(_), Value::Null) => true,
            (TypeDescriptor::Awaitable(kind, _), Value::Awaitable(awaitable)) => {
                awaitable.kind == *kind
            }
            (TypeDescriptor::Awaitable(..), Value::Null) => true,
            (TypeDescriptor::Named(_), _) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => write!(f, "void"),
            TypeDescriptor::Bool => write!(f, "bool"),
            TypeDescriptor::Int => write!(f, "int"),
            TypeDescriptor::Float => write!(f, "float"),
            TypeDescriptor::Str => write!(f, "string"),
            TypeDescriptor::List(inner) => write!(f, "{}[]", inner),
            TypeDescriptor::Named(name) => write!(f, "{}", name),
            TypeDescriptor::Awaitable(kind, inner) => write!(f, "{}<{}>", kind, inner),
        }
    }
}
