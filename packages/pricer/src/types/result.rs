//! Per-query match outcome, the unit of pipeline output.

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// How a match was established, in decreasing order of reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    /// An extracted identifier appeared verbatim (case-insensitively)
    /// in the candidate name. Always trusted, regardless of score.
    IdentifierExact,

    /// Best fuzzy name similarity at or above the acceptance threshold.
    FuzzyName,

    /// No candidate matched, but a price-looking token was found near
    /// the query context in raw page text.
    PriceFallback,

    /// Carried over from a previous run's output file. The original
    /// strategy is not recorded in the table.
    Resumed,

    /// No acceptable match. A normal outcome, not a fault.
    None,
}

/// Result of ranking one query against all candidates from all sources.
///
/// Computed once per query, then serialized and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The original input line.
    pub query: String,

    /// Accepted price in rubles, absent when unmatched.
    pub price: Option<f64>,

    /// Site the price came from.
    pub source_site: Option<String>,

    /// Listing URL the price came from.
    pub source_url: Option<String>,

    /// Candidate name that matched.
    pub matched_name: Option<String>,

    /// Similarity score 0-100. Identifier matches report 100.
    pub score: u8,

    /// How the match was established.
    pub matched_by: MatchedBy,
}

impl MatchResult {
    /// Result for a query with no acceptable match.
    pub fn none(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            price: None,
            source_site: None,
            source_url: None,
            matched_name: None,
            score: 0,
            matched_by: MatchedBy::None,
        }
    }

    /// Result from an accepted candidate.
    pub fn from_candidate(
        query: impl Into<String>,
        candidate: &Candidate,
        score: u8,
        matched_by: MatchedBy,
    ) -> Self {
        Self {
            query: query.into(),
            price: Some(candidate.price),
            source_site: Some(candidate.source_site.clone()),
            source_url: Some(candidate.source_url.clone()),
            matched_name: Some(candidate.name.clone()),
            score,
            matched_by,
        }
    }

    /// True when a price was accepted by any strategy.
    pub fn is_matched(&self) -> bool {
        self.matched_by != MatchedBy::None
    }
}

/// User-visible counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Queries processed.
    pub total: usize,

    /// Queries that matched by any strategy.
    pub matched: usize,

    /// Queries that ended as `MatchedBy::None`.
    pub unmatched: usize,
}

impl BatchSummary {
    /// Tally a set of results.
    pub fn from_results(results: &[MatchResult]) -> Self {
        let matched = results.iter().filter(|r| r.is_matched()).count();
        Self {
            total: results.len(),
            matched,
            unmatched: results.len() - matched,
        }
    }
}
