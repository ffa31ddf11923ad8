//! One product listing returned by a source for a query.

use serde::{Deserialize, Serialize};

/// A raw product candidate from a single site, prior to ranking.
///
/// Candidates are ephemeral: they feed the ranker for one query and are
/// not persisted. Prices are implicitly RUB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Product name as listed on the site.
    pub name: String,

    /// Listed price in rubles.
    pub price: f64,

    /// Direct link to the listing (or the search page if the site
    /// does not expose per-product links in its results).
    pub source_url: String,

    /// Site identifier, e.g. `"chipdip.ru"`.
    pub source_site: String,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        source_url: impl Into<String>,
        source_site: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            source_url: source_url.into(),
            source_site: source_site.into(),
        }
    }
}
