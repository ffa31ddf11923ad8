//! Adapter for the chipdip.ru JSON search API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::http::HttpFetcher;
use crate::error::{AdapterError, AdapterResult};
use crate::traits::SiteAdapter;
use crate::types::Candidate;

const SITE: &str = "chipdip.ru";
const BASE_URL: &str = "https://www.chipdip.ru";

/// Searches chipdip.ru through its `ajaxsearch` endpoint.
///
/// This is the one source with a JSON surface; no HTML scraping and no
/// page-text fallback. Items missing a usable price are dropped.
pub struct ChipdipAdapter {
    fetcher: HttpFetcher,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "Items", alias = "items", default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "Name", alias = "name", default)]
    name: String,
    #[serde(rename = "Price", alias = "price")]
    price: Option<serde_json::Value>,
    #[serde(rename = "Url", alias = "url", default)]
    url: String,
}

impl ChipdipAdapter {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            // BASE_URL is a valid literal.
            base: Url::parse(BASE_URL).expect("valid base URL"),
        }
    }

    fn search_url(&self, query: &str) -> AdapterResult<Url> {
        let mut url = self.base.join("/ajaxsearch")?;
        url.query_pairs_mut().append_pair("searchtext", query);
        Ok(url)
    }

    /// The API reports prices as either a number or a formatted
    /// string like `"1 540,00"`.
    fn parse_item_price(value: &serde_json::Value) -> Option<f64> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().filter(|p| *p > 0.0),
            serde_json::Value::String(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '\u{00A0}')
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect();
                cleaned.parse::<f64>().ok().filter(|p| *p > 0.0)
            }
            _ => None,
        }
    }

    fn to_candidates(&self, response: SearchResponse) -> Vec<Candidate> {
        response
            .items
            .into_iter()
            .filter(|item| !item.name.trim().is_empty())
            .filter_map(|item| {
                let price = item.price.as_ref().and_then(Self::parse_item_price)?;
                let url = self
                    .base
                    .join(&item.url)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| item.url.clone());
                Some(Candidate::new(item.name, price, url, SITE))
            })
            .collect()
    }
}

#[async_trait]
impl SiteAdapter for ChipdipAdapter {
    fn site(&self) -> &str {
        SITE
    }

    async fn search(&self, query: &str) -> AdapterResult<Vec<Candidate>> {
        let url = self.search_url(query)?;
        let body = self.fetcher.get_text(url.as_str(), SITE).await?;

        let response: SearchResponse =
            serde_json::from_str(&body).map_err(|e| AdapterError::Decode {
                site: SITE.to_string(),
                reason: e.to_string(),
            })?;

        let candidates = self.to_candidates(response);
        debug!(query = %query, count = candidates.len(), "chipdip search done");
        Ok(candidates)
    }
}
