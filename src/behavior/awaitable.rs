use super::Behavior;
use crate::awaitable::StandardAwaitableFactory;
use crate::invocation::Invocation;
use crate::{MockError, Result};

/// Wraps the result produced so far into the method's awaitable return type.
///
/// Placed after a throwing stage it turns the exception into a faulted
/// awaitable instead of raising it synchronously.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConvertResultToAwaitable;

impl Behavior for ConvertResultToAwaitable {
    fn execute(&self, invocation: &Invocation) -> Result<()> {
        let return_type = &invocation.method().return_type;
        let factory = StandardAwaitableFactory::for_type(return_type).ok_or_else(|| {
            MockError::MismatchedShape {
                method: invocation.method().to_string(),
                expected: "an awaitable type".to_string(),
                found: return_type.to_string(),
            }
        })?;
        invocation.convert_result_to_awaitable(&factory)
    }

    fn name(&self) -> &'static str {
        "convert-result-to-awaitable"
    }
}
