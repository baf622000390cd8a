//! Retry policy with linear backoff.
//!
//! Only precheck codes classified `RetryAfterDelay` and transport failures
//! are retried. After attempt `n` fails the executor waits
//! `base_delay * n` (500ms, 1s, 1.5s, ... with the defaults) before the
//! next transmission, up to `max_attempts` transmissions in total.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::{ConfigError, DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};

/// Bounded linear-backoff policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMaxAttempts`] if `max_attempts` is zero.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts);
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait after attempt number `attempt` (1-based) fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// True if another transmission is allowed after `attempts` so far.
    pub fn allows_another(&self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

/// Sleep for `delay` unless `cancel` fires first.
///
/// Returns `false` if cancelled. Cancellation wins ties, so a token that is
/// already cancelled never sleeps.
pub(crate) async fn backoff(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
