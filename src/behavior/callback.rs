use super::Behavior;
use crate::invocation::Invocation;
use crate::Result;

type CallbackFunction = Box<dyn Fn(&Invocation) + Send + Sync>;

/// Runs a user callback for its side effects only.
pub struct Callback {
    callback: CallbackFunction,
}

impl Callback {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl Behavior for Callback {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        (self.callback)(invocation);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "callback"
    }
}
