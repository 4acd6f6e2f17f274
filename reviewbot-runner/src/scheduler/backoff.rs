//! Reconnect backoff
//!
//! Delay applied after consecutive connection failures. The first few
//! failures wait a flat base delay; past the retry threshold the delay
//! grows linearly with the failure count up to a cap.

use std::time::Duration;

/// Backoff policy for lost connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Failures tolerated at the flat base delay
    pub retry_threshold: u32,

    /// Flat delay, and the per-failure step once past the threshold
    pub base_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl BackoffPolicy {
    pub const DEFAULT_RETRY_THRESHOLD: u32 = 5;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

    /// Delay to sleep after `failures` consecutive connection failures
    ///
    /// `failures` counts the failure that just happened, so it is at least 1.
    pub fn delay_for(&self, failures: u32) -> Duration {
        if failures > self.retry_threshold {
            self.base_delay.saturating_mul(failures).min(self.max_delay)
        } else {
            self.base_delay
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            retry_threshold: Self::DEFAULT_RETRY_THRESHOLD,
            base_delay: Self::DEFAULT_BASE_DELAY,
            max_delay: Self::DEFAULT_MAX_DELAY,
        }
    }
}
