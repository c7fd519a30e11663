//! Reconnect policy for the live feed.

use std::time::Duration;

/// Exponential backoff configuration for WebSocket reconnection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 10s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever. Default: 5.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            max_retries: Some(5),
        }
    }
}

impl ReconnectConfig {
    /// Delay before reconnect attempt number `attempt` (zero-based).
    ///
    /// `delay = min(initial * 2^attempt, max)`. No jitter: the schedule is
    /// exactly 1s, 2s, 4s, 8s, 10s with the defaults.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows(&self, attempts: u32) -> bool {
        self.max_retries.is_none_or(|max| attempts < max)
    }
}
