use super::Behavior;
use crate::invocation::Invocation;
use crate::{MockError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails once a setup has run more than `max` times.
#[derive(Debug)]
pub struct LimitInvocationCount {
    max: usize,
    count: AtomicUsize,
}

impl LimitInvocationCount {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Behavior for LimitInvocationCount {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        if count > self.max {
            return Err(MockError::InvocationCountExceeded {
                method: invocation.method().to_string(),
                limit: self.max,
            });
        }
        Ok(())
    }

    fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "limit-invocation-count"
    }
}
