use super::Behavior;
use crate::invocation::Invocation;
use crate::Result;

/// The behavior that does nothing.
///
/// Dispatch runs it when no setup matched so the fallback path has no special
/// case. It is stateless and shared through [`NoOp::instance`].
#[derive(Debug)]
pub struct NoOp {
    _private: (),
}

static INSTANCE: NoOp = NoOp { _private: () };

impl NoOp {
    pub fn instance() -> &'static NoOp {
        &INSTANCE
    }
}

impl Behavior for NoOp {
    fn execute(&self, _invocation: &Invocation) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "no-op"
    }
}
