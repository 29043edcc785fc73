//! Structured logging utilities for mock dispatch.
//!
//! This module provides helper functions for consistent, structured logging
//! of the record/match/dispatch pipeline using the `tracing` crate.

use crate::{MockError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable switching log output to JSON lines.
pub const JSON_ENV_VAR: &str = "MOCK_DISPATCH_JSON";

/// Log levels matching tracing crate levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Installs a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Setting `MOCK_DISPATCH_JSON`
/// switches to JSON output.
pub fn init_tracing(level: LogLevel) -> Result<()> {
    let fallback_filter = format!("mock_dispatch={}", level.as_filter());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    let result = if std::env::var(JSON_ENV_VAR).is_ok() {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    };

    result.map_err(|e| MockError::Logging(e.to_string()))
}

/// Log a newly recorded invocation.
pub fn log_invocation_recorded(proxy: &str, method: &str, arguments: usize) {
    tracing::trace!(proxy, method, arguments, "Invocation recorded");
}

/// Log the setup selected for an invocation.
pub fn log_setup_matched(proxy: &str, method: &str, setup: &str) {
    tracing::debug!(proxy, method, setup, "Setup matched");
}

pub fn log_no_matching_setup(proxy: &str, method: &str, strict: bool) {
    if strict {
        tracing::warn!(proxy, method, "No setup matched invocation on strict mock");
    } else {
        tracing::debug!(proxy, method, "No setup matched, using default handling");
    }
}

pub fn log_call_base(proxy: &str, method: &str) {
    tracing::debug!(proxy, method, "Delegating to base implementation");
}

pub fn log_awaitable_conversion(method: &str, awaitable: &str) {
    tracing::trace!(method, awaitable, "Result converted to awaitable");
}

/// Log an invocation whose outcome is a raised fault.
pub fn log_invocation_raised(proxy: &str, method: &str, fault: &str) {
    tracing::debug!(proxy, method, fault, "Invocation raised");
}

pub fn log_invocations_cleared(count: usize) {
    tracing::debug!(count, "Invocations cleared");
}

pub fn log_setups_reset(count: usize) {
    tracing::debug!(count, "Setup state reset");
}

pub fn log_setup_added(method: &str, total: usize) {
    tracing::debug!(method, total, "Setup added");
}
