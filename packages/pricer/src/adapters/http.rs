//! Shared HTTP fetcher for site adapters.

use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::error::{AdapterError, AdapterResult};
use crate::retry::RetryPolicy;

/// Desktop browser user agents, rotated per request. The target sites
/// serve degraded or empty markup to obvious bot agents.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
];

/// HTTP client shared by every adapter.
///
/// Wraps `reqwest` with browser-like headers, a per-request timeout,
/// and retry with exponential backoff on transient failures.
///
/// # Example
///
/// ```rust,ignore
/// use pricer::adapters::HttpFetcher;
///
/// let fetcher = HttpFetcher::new()?
///     .with_timeout(std::time::Duration::from_secs(20));
/// let body = fetcher.get_text("https://example.ru/search?q=CE285A", "example.ru").await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Create a fetcher with default settings: 20 s timeout, at most
    /// 5 redirects, Russian-locale Accept-Language.
    pub fn new() -> AdapterResult<Self> {
        Self::with_timeout_inner(Duration::from_secs(20), RetryPolicy::default())
    }

    /// Create a fetcher with an explicit timeout and retry policy.
    pub fn with_config(timeout: Duration, retry: RetryPolicy) -> AdapterResult<Self> {
        Self::with_timeout_inner(timeout, retry)
    }

    fn with_timeout_inner(timeout: Duration, retry: RetryPolicy) -> AdapterResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .default_headers(default_headers())
            .build()
            .map_err(|e| AdapterError::Http(Box::new(e)))?;
        Ok(Self { client, retry })
    }

    /// Fetch a URL and return the response body as text.
    ///
    /// Retries per the configured [`RetryPolicy`]; the error from the
    /// final attempt is returned when all attempts fail.
    pub async fn get_text(&self, url: &str, site: &str) -> AdapterResult<String> {
        let mut attempt = 1;
        loop {
            match self.get_text_once(url, site).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.retry.max_attempts && self.retry.is_retryable(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        url = %url,
                        site = %site,
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_text_once(&self, url: &str, site: &str) -> AdapterResult<String> {
        debug!(url = %url, site = %site, "fetch starting");
        let ua = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, ua)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdapterError::Timeout {
                        site: site.to_string(),
                    }
                } else {
                    AdapterError::Http(Box::new(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                site: site.to_string(),
                code: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                AdapterError::Timeout {
                    site: site.to_string(),
                }
            } else {
                AdapterError::Http(Box::new(e))
            }
        })
    }
}

fn default_headers() -> reqwest::header::HeaderMap {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru-RU,ru;q=0.9,en-US;q=0.5"),
    );
    headers
}
