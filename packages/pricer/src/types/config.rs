//! Configuration types for matching and batch execution.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Acceptance thresholds for the ranker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum fuzzy similarity (0-100) for a name match to be trusted.
    ///
    /// Identifier matches bypass this entirely. Default: 70.
    pub accept_threshold: u8,

    /// Minimum similarity for the price-fallback block scan over raw
    /// page text. Default: 65.
    pub page_fuzzy_threshold: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 70,
            page_fuzzy_threshold: 65,
        }
    }
}

impl MatchConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fuzzy acceptance threshold.
    pub fn with_accept_threshold(mut self, threshold: u8) -> Self {
        self.accept_threshold = threshold;
        self
    }

    /// Set the page-text fallback threshold.
    pub fn with_page_fuzzy_threshold(mut self, threshold: u8) -> Self {
        self.page_fuzzy_threshold = threshold;
        self
    }
}

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum simultaneously in-flight query evaluations.
    /// Exceeding this blocks until a slot frees; nothing is dropped.
    pub concurrency: usize,

    /// Per-adapter call timeout. A timed-out source contributes zero
    /// candidates and the query moves on.
    pub request_timeout: Duration,

    /// Matching thresholds.
    pub matching: MatchConfig,

    /// Retry policy applied at the HTTP boundary.
    pub retry: RetryPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            request_timeout: Duration::from_secs(20),
            matching: MatchConfig::default(),
            retry: RetryPolicy::default(),
        }
    }
}

impl BatchConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency bound.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-adapter timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set matching thresholds.
    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
