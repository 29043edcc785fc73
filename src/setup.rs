//! Configured expectations and the per-mock registry that selects among them.

use crate::behavior::{
    run_chain, Behavior, Callback, ConvertResultToAwaitable, LimitInvocationCount, ReturnBase,
    ReturnComputedValue, ReturnValue, ThrowException,
};
use crate::invocation::Invocation;
use crate::logging;
use crate::value::{Fault, Value};
use crate::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// An expectation that a call pattern produces a behavior.
pub trait Setup: Send + Sync {
    fn matches(&self, invocation: &Invocation) -> bool;

    /// Runs the behavior chain against a matched invocation.
    fn execute(&self, invocation: &Invocation) -> Result<()>;

    /// Forgets every invocation this setup has handled.
    fn reset(&self);

    /// Whether this setup has handled an invocation since the last reset.
    fn was_matched(&self) -> bool;

    fn describe(&self) -> String;
}

type ArgumentMatcher = Box<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// A setup matching calls by method name and, optionally, arguments.
pub struct ConfiguredSetup {
    method: String,
    arguments: Option<(String, ArgumentMatcher)>,
    behaviors: Vec<Arc<dyn Behavior>>,
    matched: AtomicUsize,
}

impl ConfiguredSetup {
    /// Matches any call to `method`, whatever its arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: None,
            behaviors: Vec::new(),
            matched: AtomicUsize::new(0),
        }
    }

    /// Only match calls whose arguments equal `expected`.
    pub fn with_arguments(mut self, expected: Vec<Value>) -> Self {
        let description = serde_json::to_string(&expected).unwrap_or_else(|_| "..".to_string());
        self.arguments = Some((
            description,
            Box::new(move |actual: &[Value]| actual == expected.as_slice()),
        ));
        self
    }

    /// Only match calls whose arguments satisfy `matcher`.
    pub fn with_argument_matcher<F>(mut self, description: impl Into<String>, matcher: F) -> Self
    where
        F: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        self.arguments = Some((description.into(), Box::new(matcher)));
        self
    }

    /// Appends a stage to the behavior chain.
    pub fn then<B: Behavior + 'static>(mut self, behavior: B) -> Self {
        self.behaviors.push(Arc::new(behavior));
        self
    }

    pub fn returns(self, value: impl Into<Value>) -> Self {
        self.then(ReturnValue::new(value.into()))
    }

    pub fn returns_with<F>(self, compute: F) -> Self
    where
        F: Fn(&Invocation) -> Value + Send + Sync + 'static,
    {
        self.then(ReturnComputedValue::new(compute))
    }

    pub fn returns_base(self) -> Self {
        self.then(ReturnBase)
    }

    pub fn throws(self, fault: Fault) -> Self {
        self.then(ThrowException::new(fault))
    }

    /// Completes the awaitable return type with a fault instead of raising.
    pub fn throws_async(self, fault: Fault) -> Self {
        self.throws(fault).then(ConvertResultToAwaitable)
    }

    pub fn callback<F>(self, callback: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        self.then(Callback::new(callback))
    }

    /// Fail calls beyond the first `max` handled by this setup.
    pub fn at_most(self, max: usize) -> Self {
        self.then(LimitInvocationCount::new(max))
    }

    pub fn match_count(&self) -> usize {
        self.matched.load(Ordering::SeqCst)
    }

    pub fn behavior_names(&self) -> Vec<&'static str> {
        self.behaviors.iter().map(|b| b.name()).collect()
    }
}

impl Setup for ConfiguredSetup {
    fn matches(&self, invocation: &Invocation) -> bool {
        if invocation.method().name != self.method {
            return false;
        }
        match &self.arguments {
            Some((_, matcher)) => matcher(invocation.arguments()),
            None => true,
        }
    }

    fn execute(&self, invocation: &Invocation) -> Result<()> {
        self.matched.fetch_add(1, Ordering::SeqCst);
        run_chain(&self.behaviors, invocation)
    }

    fn reset(&self) {
        self.matched.store(0, Ordering::SeqCst);
        for behavior in &self.behaviors {
            behavior.reset();
        }
    }

    fn was_matched(&self) -> bool {
        self.match_count() > 0
    }

    fn describe(&self) -> String {
        match &self.arguments {
            Some((description, _)) => format!("{}({})", self.method, description),
            None => format!("{}(*)", self.method),
        }
    }
}

impl std::fmt::Debug for ConfiguredSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguredSetup")
            .field("setup", &self.describe())
            .field("behaviors", &self.behavior_names())
            .field("matched", &self.match_count())
            .finish()
    }
}

/// The setups configured on one mock. The most recently added match wins.
#[derive(Default)]
pub struct SetupRegistry {
    setups: RwLock<Vec<Arc<dyn Setup>>>,
}

impl SetupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, setup: Arc<dyn Setup>) {
        let mut setups = self.setups.write().unwrap_or_else(PoisonError::into_inner);
        logging::log_setup_added(&setup.describe(), setups.len() + 1);
        setups.push(setup);
    }

    pub fn len(&self) -> usize {
        self.setups.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_match(&self, invocation: &Invocation) -> Option<Arc<dyn Setup>> {
        let setups = self.setups.read().unwrap_or_else(PoisonError::into_inner);
        setups
            .iter()
            .rev()
            .find(|setup| setup.matches(invocation))
            .cloned()
    }

    pub fn to_vec(&self) -> Vec<Arc<dyn Setup>> {
        self.setups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Setups that have not handled any invocation since the last reset.
    pub fn unmatched(&self) -> Vec<Arc<dyn Setup>> {
        self.to_vec()
            .into_iter()
            .filter(|setup| !setup.was_matched())
            .collect()
    }

    /// Resets the mutable state of every setup.
    ///
    /// Setup callbacks run after the registry lock is released.
    pub fn reset(&self) {
        let setups = self.to_vec();
        for setup in &setups {
            setup.reset();
        }
        logging::log_setups_reset(setups.len());
    }
}

impl std::fmt::Debug for SetupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let descriptions: Vec<String> = self.to_vec().iter().map(|s| s.describe()).collect();
        f.debug_struct("SetupRegistry")
            .field("setups", &descriptions)
            .finish()
    }
}
