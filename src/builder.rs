use crate::config::{Config, MockSettings};
use crate::invocation::{BaseImplementation, Invocation};
use crate::method::{MethodDescriptor, MethodKey, ProxyType};
use crate::mock::{Mock, MockBehavior};
use crate::setup::{ConfiguredSetup, Setup};
use crate::value::{Fault, Value};
use std::sync::Arc;

/// Fluent construction of a [`Mock`] with its dispatch table and setups.
pub struct MockBuilder {
    proxy_type: ProxyType,
    settings: MockSettings,
    bases: Vec<(MethodKey, BaseImplementation)>,
    setups: Vec<Arc<dyn Setup>>,
}

impl MockBuilder {
    pub fn new(proxy_type: impl Into<String>) -> Self {
        Self {
            proxy_type: ProxyType::new(proxy_type),
            settings: MockSettings::default(),
            bases: Vec::new(),
            setups: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.settings = config.mock;
        self
    }

    pub fn with_settings(mut self, settings: MockSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn strict(mut self) -> Self {
        self.settings.behavior = MockBehavior::Strict;
        self
    }

    pub fn call_base(mut self, enabled: bool) -> Self {
        self.settings.call_base = enabled;
        self
    }

    pub fn with_base<F>(mut self, method: &MethodDescriptor, base: F) -> Self
    where
        F: Fn(&Invocation) -> Result<Value, Fault> + Send + Sync + 'static,
    {
        self.bases.push((method.key(), Arc::new(base)));
        self
    }

    pub fn with_setup(mut self, setup: ConfiguredSetup) -> Self {
        self.setups.push(Arc::new(setup));
        self
    }

    pub fn with_shared_setup(mut self, setup: Arc<dyn Setup>) -> Self {
        self.setups.push(setup);
        self
    }

    pub fn build(self) -> Mock {
        let mut mock = Mock::with_settings(self.proxy_type, self.settings);
        for (key, base) in self.bases {
            mock.register_base_shared(key, base);
        }
        for setup in self.setups {
            mock.add_setup(setup);
        }
        mock
    }
}
