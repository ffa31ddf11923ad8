//! `partprice` — batch price lookup for printer-part price lists.
//!
//! Reads item lines from the first column of an input CSV, searches
//! the configured sites for each, and writes one output row per item
//! with the accepted price and match score. Interrupted runs resume
//! from the existing output file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pricer::adapters::{AdapterExt, ChipdipAdapter, HttpFetcher, SelectorAdapter};
use pricer::io::{read_processed, read_queries, write_results, ResumeState};
use pricer::{
    BatchConfig, BatchRunner, BatchSummary, MatchConfig, MatchResult, RetryPolicy, SiteAdapter,
};

/// Per-site request rate. The sites are small shops; be polite.
const REQUESTS_PER_SECOND: u32 = 5;

/// Rewrite the output file after every this many new results, so an
/// interrupted run loses at most one chunk.
const CHECKPOINT_EVERY: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "partprice", about = "Match price-list items against retail sites")]
struct Args {
    /// Input CSV; queries are taken from the first column.
    input: PathBuf,

    /// Output CSV: item,price_rub,source_site,source_url,match_score.
    output: PathBuf,

    /// Maximum queries in flight at once.
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Fuzzy acceptance threshold, 0-100.
    #[arg(long, default_value_t = 70, value_parser = clap::value_parser!(u8).range(..=100))]
    threshold: u8,

    /// Per-site request timeout in seconds.
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,

    /// Comma-separated sites to query, in priority order.
    #[arg(long, value_delimiter = ',', default_value = "chipdip,laserparts,tze1,zipzip")]
    sites: Vec<String>,

    /// Ignore any existing output file and start fresh.
    #[arg(long)]
    no_resume: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,pricer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let queries = read_queries(&args.input)
        .with_context(|| format!("failed to read input {}", args.input.display()))?;
    if queries.is_empty() {
        bail!("no queries found in {}", args.input.display());
    }

    let resume = if args.no_resume {
        ResumeState::default()
    } else {
        read_processed(&args.output)
            .with_context(|| format!("failed to read existing output {}", args.output.display()))?
    };

    let ResumeState { results, priced } = resume;
    let mut resolved: HashMap<String, MatchResult> = results
        .into_iter()
        .filter(|r| priced.contains(&r.query))
        .map(|r| (r.query.clone(), r))
        .collect();

    let remaining: Vec<String> = queries
        .iter()
        .filter(|q| !resolved.contains_key(*q))
        .cloned()
        .collect();
    info!(
        total = queries.len(),
        carried = resolved.len(),
        remaining = remaining.len(),
        "starting run"
    );

    let timeout = Duration::from_secs(args.timeout_secs);
    let config = BatchConfig::default()
        .with_concurrency(args.concurrency)
        .with_request_timeout(timeout)
        .with_matching(MatchConfig::new().with_accept_threshold(args.threshold))
        .with_retry(RetryPolicy::default());
    let adapters = build_adapters(&args.sites, timeout, config.retry)?;
    let runner = BatchRunner::new(adapters, config);

    for chunk in remaining.chunks(CHECKPOINT_EVERY) {
        let outcome = runner.run(chunk).await;
        for result in outcome.results {
            resolved.insert(result.query.clone(), result);
        }

        let rows = assemble_rows(&queries, &resolved, false);
        write_results(&args.output, &rows)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        info!(done = rows.len(), total = queries.len(), "checkpoint saved");
    }

    let rows = assemble_rows(&queries, &resolved, true);
    write_results(&args.output, &rows)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    let summary = BatchSummary::from_results(&rows);
    info!(
        total = summary.total,
        matched = summary.matched,
        unmatched = summary.unmatched,
        output = %args.output.display(),
        "run complete"
    );
    Ok(())
}

/// Output rows in input order. Until the run is complete, unprocessed
/// items are left out; at the end they become explicit no-match rows.
fn assemble_rows(
    queries: &[String],
    resolved: &HashMap<String, MatchResult>,
    include_missing: bool,
) -> Vec<MatchResult> {
    queries
        .iter()
        .filter_map(|q| match resolved.get(q) {
            Some(result) => Some(result.clone()),
            None if include_missing => Some(MatchResult::none(q.clone())),
            None => None,
        })
        .collect()
}

fn build_adapters(
    sites: &[String],
    timeout: Duration,
    retry: RetryPolicy,
) -> Result<Vec<Arc<dyn SiteAdapter>>> {
    let fetcher = HttpFetcher::with_config(timeout, retry).context("failed to build HTTP client")?;

    let mut adapters: Vec<Arc<dyn SiteAdapter>> = Vec::with_capacity(sites.len());
    for site in sites {
        let adapter: Arc<dyn SiteAdapter> = match site.trim() {
            "chipdip" => {
                Arc::new(ChipdipAdapter::new(fetcher.clone()).rate_limited(REQUESTS_PER_SECOND))
            }
            "laserparts" => Arc::new(
                SelectorAdapter::laserparts(fetcher.clone())
                    .context("laserparts adapter")?
                    .rate_limited(REQUESTS_PER_SECOND),
            ),
            "tze1" => Arc::new(
                SelectorAdapter::tze1(fetcher.clone())
                    .context("tze1 adapter")?
                    .rate_limited(REQUESTS_PER_SECOND),
            ),
            "zipzip" => Arc::new(
                SelectorAdapter::zipzip(fetcher.clone())
                    .context("zipzip adapter")?
                    .rate_limited(REQUESTS_PER_SECOND),
            ),
            other => bail!("unknown site {other:?} (expected chipdip, laserparts, tze1, zipzip)"),
        };
        adapters.push(adapter);
    }
    Ok(adapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_rejects_values_above_100() {
        let result = Args::try_parse_from(["partprice", "in.csv", "out.csv", "--threshold", "101"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_threshold_accepts_bounds() {
        let args =
            Args::try_parse_from(["partprice", "in.csv", "out.csv", "--threshold", "100"]).unwrap();
        assert_eq!(args.threshold, 100);
        let args = Args::try_parse_from(["partprice", "in.csv", "out.csv"]).unwrap();
        assert_eq!(args.threshold, 70);
    }

    #[test]
    fn test_default_site_list_order() {
        let args = Args::try_parse_from(["partprice", "in.csv", "out.csv"]).unwrap();
        assert_eq!(args.sites, vec!["chipdip", "laserparts", "tze1", "zipzip"]);
    }
}
