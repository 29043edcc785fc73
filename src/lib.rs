pub mod awaitable;
pub mod behavior;
pub mod builder;
pub mod config;
pub mod invocation;
pub mod invocation_log;
pub mod logging;
pub mod method;
pub mod mock;
pub mod report;
pub mod setup;
pub mod value;

use miette::Diagnostic;

pub use behavior::{Behavior, NoOp};
pub use builder::MockBuilder;
pub use config::{Config, MockSettings};
pub use invocation::Invocation;
pub use invocation_log::InvocationLog;
pub use method::{MethodDescriptor, ProxyType};
pub use mock::{Call, Mock, MockBehavior};
pub use setup::{ConfiguredSetup, Setup, SetupRegistry};
pub use value::{Fault, TypeDescriptor, Value};

/// Result type alias for mock operations
pub type Result<T> = std::result::Result<T, MockError>;

/// Error types raised while recording and dispatching invocations
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum MockError {
    #[error("Invocation index {index} is out of range (count is {count})")]
    #[diagnostic(
        code(mock::index_out_of_range),
        help("Read `count()` first, or take a snapshot with `to_vec()` to index a stable view.")
    )]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Cannot call base implementation of {method}: {reason}")]
    #[diagnostic(
        code(mock::unsupported_operation),
        help("Register a base implementation for this method on the mock, or configure a return value instead.")
    )]
    UnsupportedOperation { method: String, reason: String },

    #[error("Return type of {method} is {found}, which does not match awaitable shape {expected}")]
    #[diagnostic(
        code(mock::mismatched_shape),
        help("Only convert results of methods whose declared return type is the factory's awaitable type.")
    )]
    MismatchedShape {
        method: String,
        expected: String,
        found: String,
    },

    #[error("Invocation of {method} failed with strict mock behavior: no setup matched")]
    #[diagnostic(
        code(mock::missing_setup),
        help("All invocations on a strict mock must have a corresponding setup.")
    )]
    MissingSetup { method: String },

    #[error("{method} was invoked more than the allowed {limit} time(s)")]
    #[diagnostic(code(mock::invocation_count_exceeded))]
    InvocationCountExceeded { method: String, limit: usize },

    #[error("Invocation raised {0}")]
    #[diagnostic(code(mock::raised))]
    Raised(Fault),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(mock::config_error),
        help("Check that the configuration file is valid TOML with a [mock] section.")
    )]
    Config(String),

    #[error("Failed to serialize invocation report: {0}")]
    #[diagnostic(code(mock::serialization_failed))]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to initialize logging: {0}")]
    #[diagnostic(code(mock::logging_init_failed))]
    Logging(String),
}

impl MockError {
    /// The exception recorded on an invocation whose dispatch failed with this error.
    ///
    /// A raised fault is kept as is; any other error becomes a fault whose kind
    /// is the diagnostic code.
    pub fn to_fault(&self) -> Fault {
        match self {
            MockError::Raised(fault) => fault.clone(),
            other => {
                let kind = other
                    .code()
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "mock::error".to_string());
                Fault::new(kind, other.to_string())
            }
        }
    }
}

impl From<Fault> for MockError {
    fn from(fault: Fault) -> Self {
        MockError::Raised(fault)
    }
}
