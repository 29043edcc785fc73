//! A single call observed on a mock.
//!
//! The identity of an invocation (method, arguments, proxy type, concrete
//! implementation, base implementation) is fixed at construction. The outcome
//! slots (return value, exception, matching setup, verified flag, awaitable
//! marker) are written during dispatch and verification through `&self`, so an
//! invocation can be shared between the log and the dispatching thread.

use crate::awaitable::AwaitableFactory;
use crate::logging;
use crate::method::{MethodDescriptor, ProxyType};
use crate::setup::Setup;
use crate::value::{Fault, Value};
use crate::{MockError, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// The real implementation behind a mocked member.
pub type BaseImplementation =
    Arc<dyn Fn(&Invocation) -> std::result::Result<Value, Fault> + Send + Sync>;

#[derive(Default)]
struct Outcome {
    return_value: Option<Value>,
    exception: Option<Fault>,
    matching_setup: Option<Weak<dyn Setup>>,
    awaitable_converted: bool,
}

pub struct Invocation {
    method: MethodDescriptor,
    arguments: Box<[Value]>,
    proxy_type: ProxyType,
    method_implementation: Option<MethodDescriptor>,
    base: Option<BaseImplementation>,
    outcome: Mutex<Outcome>,
    verified: AtomicBool,
}

impl Invocation {
    pub fn new(method: MethodDescriptor, arguments: Vec<Value>, proxy_type: ProxyType) -> Self {
        Self {
            method,
            arguments: arguments.into_boxed_slice(),
            proxy_type,
            method_implementation: None,
            base: None,
            outcome: Mutex::new(Outcome::default()),
            verified: AtomicBool::new(false),
        }
    }

    /// Records the concrete method actually invoked when the call came through
    /// an explicitly implemented interface member.
    pub fn with_method_implementation(mut self, implementation: MethodDescriptor) -> Self {
        self.method_implementation = Some(implementation);
        self
    }

    pub fn with_base(mut self, base: BaseImplementation) -> Self {
        self.base = Some(base);
        self
    }

    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn proxy_type(&self) -> &ProxyType {
        &self.proxy_type
    }

    /// The concrete implementation descriptor, falling back to the declared method.
    pub fn method_implementation(&self) -> &MethodDescriptor {
        self.method_implementation.as_ref().unwrap_or(&self.method)
    }

    pub fn has_base(&self) -> bool {
        !self.method.is_abstract && self.base.is_some()
    }

    fn outcome(&self) -> MutexGuard<'_, Outcome> {
        self.outcome.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn return_value(&self) -> Option<Value> {
        self.outcome().return_value.clone()
    }

    pub fn set_return_value(&self, value: Value) {
        self.outcome().return_value = Some(value);
    }

    pub fn exception(&self) -> Option<Fault> {
        self.outcome().exception.clone()
    }

    pub fn set_exception(&self, fault: Fault) {
        self.outcome().exception = Some(fault);
    }

    /// The setup that matched this invocation, if it is still alive.
    pub fn matching_setup(&self) -> Option<Arc<dyn Setup>> {
        self.outcome()
            .matching_setup
            .as_ref()
            .and_then(Weak::upgrade)
    }

    /// Overwrites any previous match. Does not touch the verified flag.
    pub fn mark_matched_by(&self, setup: &Arc<dyn Setup>) {
        self.outcome().matching_setup = Some(Arc::downgrade(setup));
    }

    pub fn is_verified(&self) -> bool {
        self.verified.load(Ordering::Acquire)
    }

    pub fn mark_verified(&self) {
        self.verified.store(true, Ordering::Release);
    }

    pub fn is_awaitable_converted(&self) -> bool {
        self.outcome().awaitable_converted
    }

    /// Replaces the result with its async-style form produced by `factory`.
    ///
    /// A pending exception becomes a faulted awaitable and the exception slot
    /// is emptied; a plain return value becomes a completed awaitable. Values
    /// already of the awaitable shape are left alone.
    pub fn convert_result_to_awaitable(&self, factory: &dyn AwaitableFactory) -> Result<()> {
        let expected = factory.awaitable_type();
        if !expected.is_awaitable() || *expected != self.method.return_type {
            return Err(MockError::MismatchedShape {
                method: self.method.to_string(),
                expected: expected.to_string(),
                found: self.method.return_type.to_string(),
            });
        }

        // The factory runs with the outcome lock released.
        let (exception, return_value) = {
            let mut outcome = self.outcome();
            match outcome.exception.take() {
                Some(fault) => (Some(fault), None),
                None => (None, outcome.return_value.clone()),
            }
        };

        let converted = match (exception, return_value) {
            (Some(fault), _) => factory.create_faulted(fault),
            (None, Some(value)) if !expected.accepts(&value) => factory.create_completed(value),
            _ => return Ok(()),
        };

        {
            let mut outcome = self.outcome();
            outcome.return_value = Some(converted);
            outcome.awaitable_converted = true;
        }
        logging::log_awaitable_conversion(&self.method.name, &expected.to_string());
        Ok(())
    }

    /// Runs the real implementation and returns its result.
    pub fn call_base(&self) -> Result<Value> {
        if self.method.is_abstract {
            return Err(MockError::UnsupportedOperation {
                method: self.method.to_string(),
                reason: "member is abstract".to_string(),
            });
        }
        let base = self
            .base
            .as_ref()
            .ok_or_else(|| MockError::UnsupportedOperation {
                method: self.method.to_string(),
                reason: "no base implementation is reachable".to_string(),
            })?;

        logging::log_call_base(&self.proxy_type.name, &self.method.name);
        base(self).map_err(MockError::Raised)
    }

    /// The outcome as the caller sees it: the exception if one was set,
    /// otherwise the return value or the declared return type's default.
    pub fn result(&self) -> Result<Value> {
        let outcome = self.outcome();
        if let Some(fault) = &outcome.exception {
            return Err(MockError::Raised(fault.clone()));
        }
        Ok(outcome
            .return_value
            .clone()
            .unwrap_or_else(|| self.method.return_type.default_value()))
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.outcome();
        f.debug_struct("Invocation")
            .field("proxy_type", &self.proxy_type)
            .field("method", &self.method.name)
            .field("arguments", &self.arguments)
            .field("return_value", &outcome.return_value)
            .field("exception", &outcome.exception)
            .field("matched", &outcome.matching_setup.is_some())
            .field("verified", &self.is_verified())
            .finish()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.proxy_type, self.method.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let rendered = serde_json::to_string(arg).map_err(|_| fmt::Error)?;
            write!(f, "{}", rendered)?;
        }
        write!(f, ")")
    }
}
