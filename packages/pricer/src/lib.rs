//! Fuzzy Item Matching and Price Extraction
//!
//! A query-driven pricing library: take free-text item lines from a
//! customer's price list (printer parts, consumables), search a set of
//! e-commerce sources, and pick the best-priced match per item.
//!
//! # Design Philosophy
//!
//! **"Identifiers beat similarity"**
//!
//! - Manufacturer codes extracted from the query settle a match outright
//! - Fuzzy name similarity is the fallback, gated by a threshold
//! - Source failures degrade to "no candidates", never abort a batch
//! - Output is one row per input line, in input order, always
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pricer::adapters::{AdapterExt, ChipdipAdapter, HttpFetcher, SelectorAdapter};
//! use pricer::{BatchConfig, BatchRunner, SiteAdapter};
//!
//! let fetcher = HttpFetcher::new()?;
//! let adapters: Vec<Arc<dyn SiteAdapter>> = vec![
//!     Arc::new(ChipdipAdapter::new(fetcher.clone()).rate_limited(5)),
//!     Arc::new(SelectorAdapter::laserparts(fetcher.clone())?.rate_limited(5)),
//! ];
//!
//! let runner = BatchRunner::new(adapters, BatchConfig::default());
//! let outcome = runner.run(&queries).await;
//! pricer::io::write_results("out.csv", &outcome.results)?;
//! ```
//!
//! # Modules
//!
//! - [`matching`] - Pure matching core: normalize, identifiers, score, rank
//! - [`price`] - Ruble price token extraction from text
//! - [`traits`] - The [`SiteAdapter`] abstraction
//! - [`adapters`] - Site adapter implementations and HTTP plumbing
//! - [`pipeline`] - Concurrent batch runner with memoization
//! - [`io`] - CSV input/output with resume support
//! - [`testing`] - Mock adapters for tests

pub mod adapters;
pub mod error;
pub mod io;
pub mod matching;
pub mod pipeline;
pub mod price;
pub mod retry;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{AdapterError, AdapterResult, PipelineError, PipelineResult};
pub use matching::{parse_query, rank, rank_with_page, score, PageContext};
pub use pipeline::{BatchOutcome, BatchRunner, MatchCache};
pub use retry::RetryPolicy;
pub use traits::SiteAdapter;
pub use types::{
    BatchConfig, BatchSummary, Candidate, MatchConfig, MatchResult, MatchedBy, ParsedQuery,
};
