//! Trait for searching one e-commerce source.

use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::types::Candidate;

/// A searchable product source.
///
/// Implementations wrap one site's search surface, whether a JSON API
/// or a scraped HTML listing, and return uniform [`Candidate`] rows.
/// The pipeline fans queries out across every registered adapter and
/// treats each failure as "zero candidates from this source".
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use pricer::{AdapterResult, Candidate, SiteAdapter};
///
/// struct FixedAdapter;
///
/// #[async_trait]
/// impl SiteAdapter for FixedAdapter {
///     fn site(&self) -> &str {
///         "example.ru"
///     }
///
///     async fn search(&self, _query: &str) -> AdapterResult<Vec<Candidate>> {
///         Ok(vec![Candidate::new(
///             "Термоплёнка RM1-1740-040CN",
///             990.0,
///             "https://example.ru/p/1",
///             "example.ru",
///         )])
///     }
/// }
/// ```
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    /// Stable site label, e.g. `"chipdip.ru"`. Recorded on every
    /// candidate and in the output CSV's `source_site` column.
    fn site(&self) -> &str;

    /// Run one search and return candidates in the order the site
    /// listed them. An empty vec means the site answered but had
    /// nothing relevant.
    async fn search(&self, query: &str) -> AdapterResult<Vec<Candidate>>;

    /// Raw visible text of the search results page, for the
    /// price-fallback pass when no candidate matched.
    ///
    /// API-backed adapters have no page to offer and keep the default.
    async fn page_text(&self, _query: &str) -> AdapterResult<Option<String>> {
        Ok(None)
    }
}
