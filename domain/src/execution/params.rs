//! Executor parameters - retry, timeout, and backoff control.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry and timeout parameters for plugin execution.
///
/// `max_attempts` counts total attempts, not retries after the first: a
/// plugin whose analysis always fails is attempted exactly `max_attempts`
/// times. Backoff between attempts is linear (`retry_delay × n` after failed
/// attempt `n`), which bounds the worst-case wait predictably across a small
/// attempt budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorParams {
    /// Total attempts per plugin, including the first
    pub max_attempts: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Base delay for linear backoff between attempts
    pub retry_delay: Duration,
}

impl Default for ExecutorParams {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            timeout: Duration::from_secs(300),
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl ExecutorParams {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Delay to wait after failed attempt `attempt` (1-indexed) before the
    /// next one.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutorParams::default();
        assert_eq!(params.max_attempts, 2);
        assert_eq!(params.timeout, Duration::from_secs(300));
        assert_eq!(params.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_linear_backoff() {
        let params = ExecutorParams::default().with_retry_delay(Duration::from_millis(100));
        assert_eq!(params.backoff_after(1), Duration::from_millis(100));
        assert_eq!(params.backoff_after(2), Duration::from_millis(200));
        assert_eq!(params.backoff_after(3), Duration::from_millis(300));
    }

    #[test]
    fn test_max_attempts_floor() {
        // Zero attempts would mean no execution at all
        let params = ExecutorParams::default().with_max_attempts(0);
        assert_eq!(params.max_attempts, 1);
    }
}
