use crate::invocation::Invocation;
use crate::value::{Fault, Value};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// Serializable view of one recorded invocation.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationRecord {
    pub proxy_type: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    pub arguments: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<Fault>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_setup: Option<String>,
    pub verified: bool,
    pub awaitable_converted: bool,
}

impl From<&Invocation> for InvocationRecord {
    fn from(invocation: &Invocation) -> Self {
        let implementation = invocation.method_implementation();
        Self {
            proxy_type: invocation.proxy_type().name.clone(),
            method: invocation.method().to_string(),
            implementation: (implementation != invocation.method())
                .then(|| implementation.to_string()),
            arguments: invocation.arguments().to_vec(),
            return_value: invocation.return_value(),
            exception: invocation.exception(),
            matching_setup: invocation.matching_setup().map(|setup| setup.describe()),
            verified: invocation.is_verified(),
            awaitable_converted: invocation.is_awaitable_converted(),
        }
    }
}

/// Renders `invocations` as a pretty-printed JSON array.
pub fn render(invocations: &[Arc<Invocation>]) -> Result<String> {
    let records: Vec<InvocationRecord> = invocations
        .iter()
        .map(|invocation| InvocationRecord::from(invocation.as_ref()))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
