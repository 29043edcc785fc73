use super::Behavior;
use crate::invocation::Invocation;
use crate::value::Value;
use crate::Result;

/// Writes a fixed return value.
#[derive(Debug, Clone)]
pub struct ReturnValue {
    value: Value,
}

impl ReturnValue {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Behavior for ReturnValue {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        invocation.set_return_value(self.value.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "return-value"
    }
}

type ValueFunction = Box<dyn Fn(&Invocation) -> Value + Send + Sync>;

/// Computes the return value from the invocation, typically its arguments.
pub struct ReturnComputedValue {
    compute: ValueFunction,
}

impl ReturnComputedValue {
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&Invocation) -> Value + Send + Sync + 'static,
    {
        Self {
            compute: Box::new(compute),
        }
    }
}

impl Behavior for ReturnComputedValue {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        let value = (self.compute)(invocation);
        invocation.set_return_value(value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "return-computed-value"
    }
}

/// Returns whatever the base implementation returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnBase;

impl Behavior for ReturnBase {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        let value = invocation.call_base()?;
        invocation.set_return_value(value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "return-base"
    }
}
