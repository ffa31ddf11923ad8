//! Rate-limited adapter wrapper.
//!
//! Wraps any [`SiteAdapter`] with a per-site request quota using the
//! governor crate, so the batch pipeline's fan-out cannot hammer one
//! source.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;

use crate::error::AdapterResult;
use crate::traits::SiteAdapter;
use crate::types::Candidate;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// An adapter wrapper that enforces a request rate.
pub struct RateLimitedAdapter<A: SiteAdapter> {
    inner: A,
    limiter: Arc<DirectRateLimiter>,
}

impl<A: SiteAdapter> RateLimitedAdapter<A> {
    /// Wrap `adapter` with a sustained requests-per-second quota.
    /// A zero rate is clamped to one request per second.
    ///
    /// Burst is capped at one cell: governor's default burst equals
    /// the rate, which would let the batch fan-out fire that many
    /// unspaced requests at a cold limiter. Use [`with_quota`] for
    /// burst-tolerant quotas.
    ///
    /// [`with_quota`]: RateLimitedAdapter::with_quota
    pub fn new(adapter: A, requests_per_second: u32) -> Self {
        let quota =
            Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(nonzero!(1u32)))
                .allow_burst(nonzero!(1u32));
        Self {
            inner: adapter,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Wrap with a custom quota, e.g. per-minute with burst.
    pub fn with_quota(adapter: A, quota: Quota) -> Self {
        Self {
            inner: adapter,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    async fn wait_for_permit(&self) {
        self.limiter.until_ready().await;
    }
}

#[async_trait]
impl<A: SiteAdapter> SiteAdapter for RateLimitedAdapter<A> {
    fn site(&self) -> &str {
        self.inner.site()
    }

    async fn search(&self, query: &str) -> AdapterResult<Vec<Candidate>> {
        self.wait_for_permit().await;
        self.inner.search(query).await
    }

    async fn page_text(&self, query: &str) -> AdapterResult<Option<String>> {
        self.wait_for_permit().await;
        self.inner.page_text(query).await
    }
}

/// Extension trait for ergonomic wrapping.
pub trait AdapterExt: SiteAdapter + Sized {
    /// Wrap this adapter with a requests-per-second limit.
    fn rate_limited(self, requests_per_second: u32) -> RateLimitedAdapter<Self> {
        RateLimitedAdapter::new(self, requests_per_second)
    }
}

impl<A: SiteAdapter + Sized> AdapterExt for A {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAdapter;
    use std::time::Instant;

    #[tokio::test]
    async fn test_rate_limit_spaces_requests() {
        let mock = MockAdapter::new("mock.ru")
            .with_candidates("q", vec![Candidate::new("x", 1.0, "u", "mock.ru")]);
        let limited = mock.rate_limited(10);

        let start = Instant::now();
        for _ in 0..3 {
            limited.search("q").await.unwrap();
        }
        // Burst is capped at one cell, so only the first permit is
        // free: the next two must each wait ~100 ms even on a cold
        // limiter.
        assert!(start.elapsed().as_millis() >= 150);
    }

    #[tokio::test]
    async fn test_custom_quota_allows_burst() {
        use governor::Quota;
        use std::num::NonZeroU32;

        let mock = MockAdapter::new("mock.ru")
            .with_candidates("q", vec![Candidate::new("x", 1.0, "u", "mock.ru")]);
        let quota = Quota::per_second(NonZeroU32::new(10).unwrap())
            .allow_burst(NonZeroU32::new(5).unwrap());
        let limited = RateLimitedAdapter::with_quota(mock, quota);

        let start = Instant::now();
        for _ in 0..5 {
            limited.search("q").await.unwrap();
        }
        assert!(start.elapsed().as_millis() < 100);
    }

    #[tokio::test]
    async fn test_wrapper_preserves_site_and_results() {
        let mock = MockAdapter::new("mock.ru")
            .with_candidates("q", vec![Candidate::new("x", 1.0, "u", "mock.ru")]);
        let limited = mock.rate_limited(100);

        assert_eq!(limited.site(), "mock.ru");
        assert_eq!(limited.search("q").await.unwrap().len(), 1);
    }
}
