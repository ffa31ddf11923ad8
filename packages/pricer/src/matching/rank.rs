//! Candidate ranking: pick the best match for one query.

use tracing::debug;

use super::score::score;
use crate::price;
use crate::types::{Candidate, MatchConfig, MatchResult, MatchedBy, ParsedQuery};

/// Raw page text from a source, for the price-fallback pass.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Site the page came from.
    pub site: &'a str,
    /// Page URL.
    pub url: &'a str,
    /// Visible page text.
    pub text: &'a str,
}

/// Rank candidates for one query.
///
/// Identifier substring matches short-circuit scoring entirely:
/// manufacturer codes are far more reliable than fuzzy text similarity
/// for catalog parts. The first candidate (in input order) containing
/// any identifier wins — first match, not best match; this mirrors the
/// observed behavior and is deliberately left as-is.
///
/// Without an identifier hit, the highest-scoring candidate wins if it
/// clears `config.accept_threshold`; otherwise the result is
/// [`MatchedBy::None`]. Never errors: empty candidate lists and empty
/// parses degrade to a no-match result.
pub fn rank(
    parsed: &ParsedQuery,
    query_text: &str,
    candidates: &[Candidate],
    config: &MatchConfig,
) -> MatchResult {
    if !parsed.identifiers.is_empty() {
        for candidate in candidates {
            let name_lower = candidate.name.to_lowercase();
            if parsed
                .identifiers
                .iter()
                .any(|id| !id.is_empty() && name_lower.contains(&id.to_lowercase()))
            {
                debug!(
                    query = %query_text,
                    name = %candidate.name,
                    site = %candidate.source_site,
                    "identifier match"
                );
                return MatchResult::from_candidate(
                    query_text,
                    candidate,
                    100,
                    MatchedBy::IdentifierExact,
                );
            }
        }
    }

    let mut best: Option<(&Candidate, u8)> = None;
    for candidate in candidates {
        let s = score(query_text, &candidate.name);
        if best.map(|(_, bs)| s > bs).unwrap_or(true) {
            best = Some((candidate, s));
        }
    }

    match best {
        Some((candidate, s)) if s >= config.accept_threshold => {
            debug!(
                query = %query_text,
                name = %candidate.name,
                score = s,
                site = %candidate.source_site,
                "fuzzy match"
            );
            MatchResult::from_candidate(query_text, candidate, s, MatchedBy::FuzzyName)
        }
        _ => MatchResult::none(query_text),
    }
}

/// Rank candidates, then fall back to raw page text.
///
/// When the candidate pass yields no match and a page context is
/// available, look for a price-looking token near the query context:
/// first inside a window around an identifier occurrence, then inside
/// the page block most similar to the query's name text.
pub fn rank_with_page(
    parsed: &ParsedQuery,
    query_text: &str,
    candidates: &[Candidate],
    page: Option<PageContext<'_>>,
    config: &MatchConfig,
) -> MatchResult {
    let result = rank(parsed, query_text, candidates, config);
    if result.is_matched() {
        return result;
    }
    let Some(page) = page else {
        return result;
    };

    if let Some(found) = price_fallback(parsed, page, config) {
        debug!(
            query = %query_text,
            price = found.price,
            site = %page.site,
            score = found.score,
            "price fallback"
        );
        return MatchResult {
            query: query_text.to_string(),
            price: Some(found.price),
            source_site: Some(page.site.to_string()),
            source_url: Some(page.url.to_string()),
            matched_name: None,
            score: found.score,
            matched_by: MatchedBy::PriceFallback,
        };
    }

    result
}

struct FallbackHit {
    price: f64,
    score: u8,
}

fn price_fallback(
    parsed: &ParsedQuery,
    page: PageContext<'_>,
    config: &MatchConfig,
) -> Option<FallbackHit> {
    let name = parsed.name_text();

    // Without a structured identifier, a single 6+ alphanumeric run in
    // the description still anchors the window scan.
    let mut identifiers = parsed.identifiers.clone();
    if identifiers.is_empty() {
        identifiers.extend(super::identifiers::extract_single_identifier(&name));
    }
    if let Some(price) = price::price_near_identifier(page.text, &identifiers) {
        // The identifier itself was sighted on the page.
        return Some(FallbackHit { price, score: 100 });
    }

    price::price_near_name(page.text, &name, config.page_fuzzy_threshold)
        .map(|(price, s)| FallbackHit { price, score: s })
}
