//! The per-mock coordinator that records calls and dispatches them to setups.
//!
//! An interceptor calls [`Mock::intercept`] once per observed call. The call is
//! first recorded in the mock's [`InvocationLog`], then matched against the
//! setups (latest first). A matching setup runs its behavior chain; otherwise
//! the [`NoOp`] behavior runs and the mock's settings decide the fallback.

use crate::awaitable::StandardAwaitableFactory;
use crate::behavior::{Behavior, NoOp};
use crate::config::MockSettings;
use crate::invocation::{BaseImplementation, Invocation};
use crate::invocation_log::InvocationLog;
use crate::logging;
use crate::method::{MethodDescriptor, MethodKey, ProxyType};
use crate::report;
use crate::setup::{ConfiguredSetup, Setup, SetupRegistry};
use crate::value::{Fault, Value};
use crate::{MockError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// How a mock treats calls that no setup matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockBehavior {
    /// Return the declared return type's default.
    #[default]
    Loose,
    /// Fail with [`MockError::MissingSetup`].
    Strict,
}

/// A call delivered by the interception layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: MethodDescriptor,
    pub arguments: Vec<Value>,
    /// Set when the call arrived through an explicitly implemented member.
    pub implementation: Option<MethodDescriptor>,
}

impl Call {
    pub fn new(method: MethodDescriptor, arguments: Vec<Value>) -> Self {
        Self {
            method,
            arguments,
            implementation: None,
        }
    }

    pub fn with_implementation(mut self, implementation: MethodDescriptor) -> Self {
        self.implementation = Some(implementation);
        self
    }
}

pub struct Mock {
    proxy_type: ProxyType,
    settings: MockSettings,
    setups: Arc<SetupRegistry>,
    invocations: InvocationLog,
    bases: HashMap<MethodKey, BaseImplementation>,
}

impl Mock {
    pub fn new(proxy_type: ProxyType) -> Self {
        Self::with_settings(proxy_type, MockSettings::default())
    }

    pub fn with_settings(proxy_type: ProxyType, settings: MockSettings) -> Self {
        let setups = Arc::new(SetupRegistry::new());
        Self {
            proxy_type,
            settings,
            invocations: InvocationLog::new(setups.clone()),
            setups,
            bases: HashMap::new(),
        }
    }

    pub fn proxy_type(&self) -> &ProxyType {
        &self.proxy_type
    }

    pub fn settings(&self) -> MockSettings {
        self.settings
    }

    pub fn invocations(&self) -> &InvocationLog {
        &self.invocations
    }

    pub fn setups(&self) -> &SetupRegistry {
        &self.setups
    }

    /// Adds `setup` and returns a handle for inspecting its match state.
    pub fn setup(&self, setup: ConfiguredSetup) -> Arc<ConfiguredSetup> {
        let setup = Arc::new(setup);
        self.setups.add(setup.clone());
        setup
    }

    pub fn add_setup(&self, setup: Arc<dyn Setup>) {
        self.setups.add(setup);
    }

    /// Registers the real implementation of `method` in the dispatch table.
    pub fn register_base<F>(&mut self, method: &MethodDescriptor, base: F)
    where
        F: Fn(&Invocation) -> std::result::Result<Value, Fault> + Send + Sync + 'static,
    {
        self.register_base_shared(method.key(), Arc::new(base));
    }

    pub(crate) fn register_base_shared(&mut self, key: MethodKey, base: BaseImplementation) {
        self.bases.insert(key, base);
    }

    /// Creates an invocation for `call` and appends it to the log.
    pub fn record(&self, call: Call) -> Arc<Invocation> {
        let Call {
            method,
            arguments,
            implementation,
        } = call;

        let base = if method.is_abstract {
            None
        } else {
            self.bases.get(&method.key()).cloned()
        };

        let mut invocation = Invocation::new(method, arguments, self.proxy_type.clone());
        if let Some(implementation) = implementation {
            invocation = invocation.with_method_implementation(implementation);
        }
        if let Some(base) = base {
            invocation = invocation.with_base(base);
        }

        let invocation = Arc::new(invocation);
        self.invocations.add(invocation.clone());
        logging::log_invocation_recorded(
            &self.proxy_type.name,
            &invocation.method().name,
            invocation.arguments().len(),
        );
        invocation
    }

    /// Matches `invocation` against the setups and computes its outcome.
    ///
    /// Any error is also written to the invocation's exception slot.
    pub fn dispatch(&self, invocation: &Invocation) -> Result<Value> {
        match self.run_dispatch(invocation) {
            Ok(()) => invocation.result(),
            Err(error) => {
                invocation.set_exception(error.to_fault());
                logging::log_invocation_raised(
                    &self.proxy_type.name,
                    &invocation.method().name,
                    &error.to_string(),
                );
                Err(error)
            }
        }
    }

    fn run_dispatch(&self, invocation: &Invocation) -> Result<()> {
        let executed = match self.setups.find_match(invocation) {
            Some(setup) => {
                logging::log_setup_matched(
                    &self.proxy_type.name,
                    &invocation.method().name,
                    &setup.describe(),
                );
                invocation.mark_matched_by(&setup);
                setup.execute(invocation)
            }
            None => self.dispatch_unmatched(invocation),
        };
        executed?;

        if invocation.exception().is_none() {
            if let Some(factory) =
                StandardAwaitableFactory::for_type(&invocation.method().return_type)
            {
                invocation.convert_result_to_awaitable(&factory)?;
            }
        }
        Ok(())
    }

    fn dispatch_unmatched(&self, invocation: &Invocation) -> Result<()> {
        let strict = self.settings.behavior == MockBehavior::Strict;
        logging::log_no_matching_setup(&self.proxy_type.name, &invocation.method().name, strict);

        NoOp::instance().execute(invocation)?;

        if strict {
            return Err(MockError::MissingSetup {
                method: invocation.method().to_string(),
            });
        }
        if self.settings.call_base && invocation.has_base() {
            let value = invocation.call_base()?;
            invocation.set_return_value(value);
        }
        Ok(())
    }

    /// Records `call` and dispatches it.
    pub fn intercept(&self, call: Call) -> Result<Value> {
        let invocation = self.record(call);
        self.dispatch(&invocation)
    }

    /// Discards recorded invocations and resets setup match state.
    pub fn reset_invocations(&self) {
        self.invocations.clear();
    }

    pub fn unverified_invocations(&self) -> Vec<Arc<Invocation>> {
        self.invocations
            .to_vec_matching(|invocation| !invocation.is_verified())
    }

    /// Pretty JSON rendering of every recorded invocation.
    pub fn invocation_report(&self) -> Result<String> {
        report::render(&self.invocations.to_vec())
    }
}

impl std::fmt::Debug for Mock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mock")
            .field("proxy_type", &self.proxy_type)
            .field("settings", &self.settings)
            .field("setups", &self.setups)
            .field("invocations", &self.invocations)
            .field("bases", &self.bases.len())
            .finish()
    }
}
