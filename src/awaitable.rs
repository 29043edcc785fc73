use crate::value::{Awaitable, AwaitableKind, Fault, TypeDescriptor, Value};

/// Wraps plain results into an async-style result of one awaitable type.
pub trait AwaitableFactory: Send + Sync {
    /// The awaitable return type this factory produces values for.
    fn awaitable_type(&self) -> &TypeDescriptor;

    fn create_completed(&self, value: Value) -> Value;

    fn create_faulted(&self, fault: Fault) -> Value;
}

/// Factory for the built-in `Task<T>` and `ValueTask<T>` shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardAwaitableFactory {
    kind: AwaitableKind,
    awaitable_type: TypeDescriptor,
}

impl StandardAwaitableFactory {
    /// Returns a factory when `return_type` is awaitable-shaped.
    pub fn for_type(return_type: &TypeDescriptor) -> Option<Self> {
        match return_type {
            TypeDescriptor::Awaitable(kind, _) => Some(Self {
                kind: *kind,
                awaitable_type: return_type.clone(),
            }),
            _ => None,
        }
    }
}

impl AwaitableFactory for StandardAwaitableFactory {
    fn awaitable_type(&self) -> &TypeDescriptor {
        &self.awaitable_type
    }

    fn create_completed(&self, value: Value) -> Value {
        Value::Awaitable(Awaitable::completed(self.kind, value))
    }

    fn create_faulted(&self, fault: Fault) -> Value {
        Value::Awaitable(Awaitable::faulted(self.kind, fault))
    }
}
