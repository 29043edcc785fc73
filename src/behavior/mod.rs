//! Pipeline stages that compute the outcome of a matched invocation.
//!
//! A setup owns an ordered chain of behaviors and runs every stage in turn.
//! The chain itself never exits early: a stage that records an exception
//! leaves later stages free to run. Only an `Err` returned from `execute`
//! stops the chain, and it propagates out of the dispatch as the call's
//! outcome.

mod awaitable;
mod callback;
mod limit;
mod noop;
mod returns;
mod throws;

pub use awaitable::ConvertResultToAwaitable;
pub use callback::Callback;
pub use limit::LimitInvocationCount;
pub use noop::NoOp;
pub use returns::{ReturnBase, ReturnComputedValue, ReturnValue};
pub use throws::{ThrowComputedException, ThrowException};

use crate::invocation::Invocation;
use crate::Result;
use std::sync::Arc;

/// A single stage of a behavior chain.
pub trait Behavior: Send + Sync {
    /// Inspects `invocation` and writes its outcome slots.
    fn execute(&self, invocation: &Invocation) -> Result<()>;

    /// Clears any state kept across invocations.
    fn reset(&self) {}

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Runs `chain` against `invocation` in order.
pub fn run_chain(chain: &[Arc<dyn Behavior>], invocation: &Invocation) -> Result<()> {
    for behavior in chain {
        behavior.execute(invocation)?;
    }
    Ok(())
}
