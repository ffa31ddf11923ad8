//! Concurrent fan-out of queries across site adapters.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::cache::MatchCache;
use crate::matching::{parse_query, rank, rank_with_page, PageContext};
use crate::traits::SiteAdapter;
use crate::types::{BatchConfig, BatchSummary, MatchResult};

/// Results of one batch run, in input order.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<MatchResult>,
    pub summary: BatchSummary,
}

/// Runs query batches against an ordered set of adapters.
///
/// Adapter order is priority order: the first adapter whose results
/// produce an accepted match settles the query, and later adapters are
/// never contacted for it. Within a batch, up to
/// [`BatchConfig::concurrency`] queries are in flight at once, and the
/// output preserves input order regardless of completion order.
///
/// Failures never abort the batch. A failed or timed-out adapter call
/// counts as zero candidates from that source, and a panicked worker
/// task degrades to a no-match row.
///
/// # Example
///
/// ```rust,ignore
/// use pricer::{BatchConfig, BatchRunner};
///
/// let runner = BatchRunner::new(adapters, BatchConfig::default());
/// let outcome = runner.run(&queries).await;
/// println!("{} of {} matched", outcome.summary.matched, outcome.summary.total);
/// ```
pub struct BatchRunner {
    adapters: Arc<Vec<Arc<dyn SiteAdapter>>>,
    config: BatchConfig,
    cache: MatchCache,
}

impl BatchRunner {
    pub fn new(adapters: Vec<Arc<dyn SiteAdapter>>, config: BatchConfig) -> Self {
        Self {
            adapters: Arc::new(adapters),
            config,
            cache: MatchCache::new(),
        }
    }

    /// Share an existing cache, e.g. across chunked runs.
    pub fn with_cache(mut self, cache: MatchCache) -> Self {
        self.cache = cache;
        self
    }

    /// Process `queries` and return one result per query, in input
    /// order.
    pub async fn run(&self, queries: &[String]) -> BatchOutcome {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut handles = Vec::with_capacity(queries.len());

        for query in queries {
            let query = query.clone();
            let adapters = Arc::clone(&self.adapters);
            let config = self.config.clone();
            let cache = self.cache.clone();
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                // Closed only if the semaphore is dropped, which it is not.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("semaphore closed");
                process_query(&adapters, &config, &cache, &query).await
            }));
        }

        let mut results = Vec::with_capacity(queries.len());
        for (joined, query) in join_all(handles).await.into_iter().zip(queries) {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(query = %query, error = %e, "worker task failed");
                    results.push(MatchResult::none(query));
                }
            }
        }

        let summary = BatchSummary::from_results(&results);
        info!(
            total = summary.total,
            matched = summary.matched,
            unmatched = summary.unmatched,
            "batch complete"
        );
        BatchOutcome { results, summary }
    }
}

async fn process_query(
    adapters: &[Arc<dyn SiteAdapter>],
    config: &BatchConfig,
    cache: &MatchCache,
    query: &str,
) -> MatchResult {
    if let Some(hit) = cache.get(query).await {
        debug!(query = %query, "cache hit");
        return hit;
    }

    let parsed = parse_query(query);
    let mut result = MatchResult::none(query);

    for adapter in adapters {
        let site = adapter.site();

        let candidates =
            match tokio::time::timeout(config.request_timeout, adapter.search(query)).await {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(e)) => {
                    warn!(query = %query, site = %site, error = %e, "search failed");
                    Vec::new()
                }
                Err(_) => {
                    warn!(query = %query, site = %site, "search timed out");
                    Vec::new()
                }
            };

        result = rank(&parsed, query, &candidates, &config.matching);
        if result.is_matched() {
            break;
        }

        // Candidate pass came up empty; try a price sighting in the
        // raw page text before moving to the next source.
        let page_text =
            match tokio::time::timeout(config.request_timeout, adapter.page_text(query)).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!(query = %query, site = %site, error = %e, "page fetch failed");
                    None
                }
                Err(_) => {
                    warn!(query = %query, site = %site, "page fetch timed out");
                    None
                }
            };

        if let Some(text) = page_text {
            let label = search_page_label(site);
            let page = PageContext {
                site,
                url: &label,
                text: &text,
            };
            result = rank_with_page(&parsed, query, &[], Some(page), &config.matching);
            if result.is_matched() {
                break;
            }
        }
    }

    cache.insert(query, result.clone()).await;
    result
}

/// Fallback rows have no product URL; attribute them to the site root.
fn search_page_label(site: &str) -> String {
    format!("https://{site}/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockAdapter;
    use crate::types::{Candidate, MatchedBy};
    use std::time::Duration;

    fn candidate(name: &str, price: f64, site: &str) -> Candidate {
        Candidate::new(name, price, format!("https://{site}/p/1"), site)
    }

    #[tokio::test]
    async fn test_first_adapter_with_match_wins() {
        let first = MockAdapter::new("first.ru").with_candidates(
            "Картридж CE285A",
            vec![candidate("Картридж CE285A HP", 900.0, "first.ru")],
        );
        let second = MockAdapter::new("second.ru").with_candidates(
            "Картридж CE285A",
            vec![candidate("Картридж CE285A HP", 500.0, "second.ru")],
        );
        let second_probe = second.clone();

        let runner = BatchRunner::new(
            vec![Arc::new(first), Arc::new(second)],
            BatchConfig::default(),
        );
        let outcome = runner.run(&["Картридж CE285A".to_string()]).await;

        assert_eq!(outcome.results[0].source_site.as_deref(), Some("first.ru"));
        assert_eq!(second_probe.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_failed_adapter_falls_through_to_next() {
        let broken = MockAdapter::new("broken.ru").with_failure("Картридж CE285A");
        let working = MockAdapter::new("working.ru").with_candidates(
            "Картридж CE285A",
            vec![candidate("Картридж CE285A HP", 900.0, "working.ru")],
        );

        let runner = BatchRunner::new(
            vec![Arc::new(broken), Arc::new(working)],
            BatchConfig::default(),
        );
        let outcome = runner.run(&["Картридж CE285A".to_string()]).await;

        assert_eq!(
            outcome.results[0].source_site.as_deref(),
            Some("working.ru")
        );
        assert_eq!(outcome.summary.matched, 1);
    }

    #[tokio::test]
    async fn test_slow_adapter_times_out_and_next_answers() {
        let slow = MockAdapter::new("slow.ru")
            .with_latency(Duration::from_millis(200))
            .with_candidates(
                "Картридж CE285A",
                vec![candidate("Картридж CE285A HP", 100.0, "slow.ru")],
            );
        let fast = MockAdapter::new("fast.ru").with_candidates(
            "Картридж CE285A",
            vec![candidate("Картридж CE285A HP", 900.0, "fast.ru")],
        );

        let config = BatchConfig::default().with_request_timeout(Duration::from_millis(20));
        let runner = BatchRunner::new(vec![Arc::new(slow), Arc::new(fast)], config);
        let outcome = runner.run(&["Картридж CE285A".to_string()]).await;

        assert_eq!(outcome.results[0].source_site.as_deref(), Some("fast.ru"));
    }

    #[tokio::test]
    async fn test_all_adapters_fail_gives_no_match_row() {
        let broken = MockAdapter::new("broken.ru").with_status_failure("q", 503);
        let runner = BatchRunner::new(vec![Arc::new(broken)], BatchConfig::default());

        let outcome = runner.run(&["q".to_string()]).await;
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].matched_by, MatchedBy::None);
        assert_eq!(outcome.summary.unmatched, 1);
    }

    #[tokio::test]
    async fn test_page_fallback_when_no_tiles() {
        let adapter = MockAdapter::new("shop.ru").with_page_text(
            "Термоплёнка RM1-1740-040CN",
            "Термоплёнка RM1-1740-040CN совместимая, цена 990 руб.",
        );

        let runner = BatchRunner::new(vec![Arc::new(adapter)], BatchConfig::default());
        let outcome = runner
            .run(&["Термоплёнка RM1-1740-040CN".to_string()])
            .await;

        let result = &outcome.results[0];
        assert_eq!(result.matched_by, MatchedBy::PriceFallback);
        assert_eq!(result.price, Some(990.0));
        assert_eq!(result.source_site.as_deref(), Some("shop.ru"));
    }

    #[tokio::test]
    async fn test_duplicate_queries_served_from_cache() {
        let adapter = MockAdapter::new("mock.ru").with_candidates(
            "Картридж CE285A",
            vec![candidate("Картридж CE285A HP", 900.0, "mock.ru")],
        );
        let probe = adapter.clone();

        // Concurrency 1 so the duplicate runs after the first finishes.
        let config = BatchConfig::default().with_concurrency(1);
        let runner = BatchRunner::new(vec![Arc::new(adapter)], config);
        let queries = vec!["Картридж CE285A".to_string(), "Картридж CE285A".to_string()];
        let outcome = runner.run(&queries).await;

        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].price, outcome.results[1].price);
        assert_eq!(probe.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        let adapter = MockAdapter::new("mock.ru")
            .with_latency(Duration::from_millis(5))
            .with_candidates("a", vec![candidate("a", 1.0, "mock.ru")])
            .with_candidates("b", vec![candidate("b", 2.0, "mock.ru")])
            .with_candidates("c", vec![candidate("c", 3.0, "mock.ru")]);

        let runner = BatchRunner::new(vec![Arc::new(adapter)], BatchConfig::default());
        let queries: Vec<String> = ["c", "a", "b"].iter().map(|s| s.to_string()).collect();
        let outcome = runner.run(&queries).await;

        let echoed: Vec<&str> = outcome.results.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(echoed, vec!["c", "a", "b"]);
    }
}
