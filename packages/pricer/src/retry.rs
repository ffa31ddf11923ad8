//! Retry policy for transient fetch failures.

use std::time::Duration;

use rand::Rng;

use crate::error::AdapterError;

/// Exponential backoff with jitter for HTTP fetches.
///
/// Retries cover timeouts, transport errors, and throttling or server
/// status codes. Decode failures and client errors are permanent and
/// surface immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retries.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
    /// Cap on the computed delay, before jitter.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Whether `error` is worth another attempt.
    pub fn is_retryable(&self, error: &AdapterError) -> bool {
        match error {
            AdapterError::Timeout { .. } | AdapterError::Http(_) => true,
            AdapterError::Status { code, .. } => *code == 429 || *code >= 500,
            AdapterError::Decode { .. } | AdapterError::InvalidUrl(_) | AdapterError::Json(_) => {
                false
            }
        }
    }

    /// Backoff delay before retry number `attempt` (1-based), with up
    /// to 20% random jitter to avoid synchronized retries across
    /// worker tasks.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let base = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(exp))
            .min(self.max_delay);
        let jitter = rand::thread_rng().gen_range(0.0..0.2);
        base.mul_f64(1.0 + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_until_cap() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(350),
        };

        let d1 = policy.delay_for(1);
        let d2 = policy.delay_for(2);
        let d3 = policy.delay_for(3);
        assert!(d1 >= Duration::from_millis(100) && d1 < Duration::from_millis(121));
        assert!(d2 >= Duration::from_millis(200) && d2 < Duration::from_millis(241));
        // Capped at max_delay before jitter.
        assert!(d3 >= Duration::from_millis(350) && d3 < Duration::from_millis(421));
    }

    #[test]
    fn test_retryable_classification() {
        let policy = RetryPolicy::default();
        assert!(policy.is_retryable(&AdapterError::Timeout {
            site: "a.ru".to_string()
        }));
        assert!(policy.is_retryable(&AdapterError::Status {
            site: "a.ru".to_string(),
            code: 503
        }));
        assert!(policy.is_retryable(&AdapterError::Status {
            site: "a.ru".to_string(),
            code: 429
        }));
        assert!(!policy.is_retryable(&AdapterError::Status {
            site: "a.ru".to_string(),
            code: 404
        }));
        assert!(!policy.is_retryable(&AdapterError::Decode {
            site: "a.ru".to_string(),
            reason: "bad json".to_string()
        }));
    }

    #[test]
    fn test_min_one_attempt() {
        assert_eq!(RetryPolicy::new().with_max_attempts(0).max_attempts, 1);
    }
}
