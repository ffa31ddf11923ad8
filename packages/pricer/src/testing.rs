//! Test doubles for the adapter trait.
//!
//! `MockAdapter` serves canned candidates without network access and
//! records every call, so pipeline tests can assert on fan-out
//! behavior, ordering, and failure handling deterministically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{AdapterError, AdapterResult};
use crate::traits::SiteAdapter;
use crate::types::Candidate;

/// In-memory [`SiteAdapter`] for tests.
///
/// # Example
///
/// ```rust,ignore
/// use pricer::testing::MockAdapter;
/// use pricer::Candidate;
///
/// let adapter = MockAdapter::new("mock.ru")
///     .with_candidates("CE285A", vec![Candidate::new(
///         "Картридж CE285A", 900.0, "https://mock.ru/1", "mock.ru",
///     )])
///     .with_failure("битый запрос")
///     .with_latency(std::time::Duration::from_millis(10));
/// ```
#[derive(Clone)]
pub struct MockAdapter {
    site: String,
    candidates: HashMap<String, Vec<Candidate>>,
    pages: HashMap<String, String>,
    failures: HashMap<String, FailureKind>,
    latency: Option<Duration>,
    calls: Arc<RwLock<Vec<String>>>,
}

#[derive(Clone, Copy)]
enum FailureKind {
    Http,
    Timeout,
    Status(u16),
}

impl MockAdapter {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            candidates: HashMap::new(),
            pages: HashMap::new(),
            failures: HashMap::new(),
            latency: None,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Serve `candidates` for an exact `query`.
    pub fn with_candidates(mut self, query: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        self.candidates.insert(query.into(), candidates);
        self
    }

    /// Serve raw page text for `query`, enabling the fallback path.
    pub fn with_page_text(mut self, query: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(query.into(), text.into());
        self
    }

    /// Fail with a transport error for `query`.
    pub fn with_failure(mut self, query: impl Into<String>) -> Self {
        self.failures.insert(query.into(), FailureKind::Http);
        self
    }

    /// Fail with a timeout for `query`.
    pub fn with_timeout(mut self, query: impl Into<String>) -> Self {
        self.failures.insert(query.into(), FailureKind::Timeout);
        self
    }

    /// Fail with an HTTP status for `query`.
    pub fn with_status_failure(mut self, query: impl Into<String>, code: u16) -> Self {
        self.failures.insert(query.into(), FailureKind::Status(code));
        self
    }

    /// Sleep this long inside every call, to exercise concurrency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queries `search` was called with, in call order.
    pub async fn search_calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Number of `search` calls so far.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    fn failure_for(&self, query: &str) -> Option<AdapterError> {
        match self.failures.get(query)? {
            FailureKind::Http => Some(AdapterError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "mock connection reset",
            )))),
            FailureKind::Timeout => Some(AdapterError::Timeout {
                site: self.site.clone(),
            }),
            FailureKind::Status(code) => Some(AdapterError::Status {
                site: self.site.clone(),
                code: *code,
            }),
        }
    }
}

#[async_trait]
impl SiteAdapter for MockAdapter {
    fn site(&self) -> &str {
        &self.site
    }

    async fn search(&self, query: &str) -> AdapterResult<Vec<Candidate>> {
        self.calls.write().await.push(query.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.failure_for(query) {
            return Err(error);
        }
        Ok(self.candidates.get(query).cloned().unwrap_or_default())
    }

    async fn page_text(&self, query: &str) -> AdapterResult<Option<String>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.failure_for(query) {
            return Err(error);
        }
        Ok(self.pages.get(query).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_configured_candidates() {
        let adapter = MockAdapter::new("mock.ru").with_candidates(
            "CE285A",
            vec![Candidate::new("Картридж CE285A", 900.0, "https://mock.ru/1", "mock.ru")],
        );

        assert_eq!(adapter.search("CE285A").await.unwrap().len(), 1);
        assert!(adapter.search("другое").await.unwrap().is_empty());
        assert_eq!(adapter.search_calls().await, vec!["CE285A", "другое"]);
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let adapter = MockAdapter::new("mock.ru").with_timeout("q");
        let err = adapter.search("q").await.unwrap_err();
        assert!(matches!(err, AdapterError::Timeout { .. }));
    }
}
