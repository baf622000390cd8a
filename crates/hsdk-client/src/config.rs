//! Executor configuration.
//!
//! Defaults suit a public network node. Override via environment variables
//! or explicit construction for tests and private networks.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Default number of transmissions per logical request.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default backoff unit; attempt `n` waits `n` times this long.
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;

/// Default per-transmission timeout handed to transports.
pub const DEFAULT_TRANSPORT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`crate::RequestExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Retry policy used by [`crate::RequestExecutor::execute`].
    pub policy: RetryPolicy,
    /// Upper bound on each transport wait. An executor built with
    /// [`crate::RequestExecutor::from_config`] treats an elapsed wait as
    /// [`crate::TransportError::Timeout`].
    pub transport_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::default(),
            transport_timeout: Duration::from_secs(DEFAULT_TRANSPORT_TIMEOUT_SECS),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `HSDK_MAX_ATTEMPTS` (default: 5, must be at least 1)
    /// - `HSDK_BASE_DELAY_MS` (default: 500)
    /// - `HSDK_TRANSPORT_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_attempts = env_parse(&lookup, "HSDK_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        let base_delay_ms = env_parse(&lookup, "HSDK_BASE_DELAY_MS", DEFAULT_BASE_DELAY_MS)?;
        let timeout_secs = env_parse(
            &lookup,
            "HSDK_TRANSPORT_TIMEOUT_SECS",
            DEFAULT_TRANSPORT_TIMEOUT_SECS,
        )?;

        Ok(Self {
            policy: RetryPolicy::new(max_attempts, Duration::from_millis(base_delay_ms))?,
            transport_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// The default retry policy.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_attempts must be at least 1")]
    InvalidMaxAttempts,
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}
