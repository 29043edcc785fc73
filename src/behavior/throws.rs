use super::Behavior;
use crate::invocation::Invocation;
use crate::value::Fault;
use crate::Result;

/// Records a fixed exception as the call's outcome.
#[derive(Debug, Clone)]
pub struct ThrowException {
    fault: Fault,
}

impl ThrowException {
    pub fn new(fault: Fault) -> Self {
        Self { fault }
    }
}

impl Behavior for ThrowException {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        invocation.set_exception(self.fault.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "throw-exception"
    }
}

type FaultFunction = Box<dyn Fn(&Invocation) -> Fault + Send + Sync>;

/// Records an exception computed from the invocation.
pub struct ThrowComputedException {
    compute: FaultFunction,
}

impl ThrowComputedException {
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&Invocation) -> Fault + Send + Sync + 'static,
    {
        Self {
            compute: Box::new(compute),
        }
    }
}

impl Behavior for ThrowComputedException {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        let fault = (self.compute)(invocation);
        invocation.set_exception(fault);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "throw-computed-exception"
    }
}
