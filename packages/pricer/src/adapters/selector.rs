//! CSS-selector driven adapter for scraped HTML listings.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::http::HttpFetcher;
use crate::error::{AdapterError, AdapterResult};
use crate::price;
use crate::traits::SiteAdapter;
use crate::types::Candidate;

/// Shape of one site's search results markup.
///
/// `search_base` plus `query_param` form the search URL; the three
/// selectors locate product tiles and the name and price inside each.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    pub site: String,
    pub search_base: String,
    pub query_param: String,
    pub item_selector: String,
    pub name_selector: String,
    pub price_selector: String,
}

impl SelectorConfig {
    pub fn new(
        site: impl Into<String>,
        search_base: impl Into<String>,
        query_param: impl Into<String>,
        item_selector: impl Into<String>,
        name_selector: impl Into<String>,
        price_selector: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            search_base: search_base.into(),
            query_param: query_param.into(),
            item_selector: item_selector.into(),
            name_selector: name_selector.into(),
            price_selector: price_selector.into(),
        }
    }
}

/// Generic adapter for sites scraped off their HTML search pages.
///
/// One instance per site, configured with a [`SelectorConfig`]; the
/// presets cover the sources this tool ships with.
///
/// # Example
///
/// ```rust,ignore
/// use pricer::adapters::{HttpFetcher, SelectorAdapter};
///
/// let adapter = SelectorAdapter::laserparts(HttpFetcher::new()?)?;
/// let candidates = adapter.search("Термоплёнка RM1-1740-040CN").await?;
/// ```
pub struct SelectorAdapter {
    fetcher: HttpFetcher,
    config: SelectorConfig,
    item_sel: Selector,
    name_sel: Selector,
    price_sel: Selector,
    link_sel: Selector,
    base: Url,
}

impl SelectorAdapter {
    pub fn new(fetcher: HttpFetcher, config: SelectorConfig) -> AdapterResult<Self> {
        let item_sel = parse_selector(&config.site, &config.item_selector)?;
        let name_sel = parse_selector(&config.site, &config.name_selector)?;
        let price_sel = parse_selector(&config.site, &config.price_selector)?;
        let link_sel = parse_selector(&config.site, "a")?;
        let base = Url::parse(&config.search_base)?;
        Ok(Self {
            fetcher,
            config,
            item_sel,
            name_sel,
            price_sel,
            link_sel,
            base,
        })
    }

    /// laserparts.ru search listing.
    pub fn laserparts(fetcher: HttpFetcher) -> AdapterResult<Self> {
        Self::new(
            fetcher,
            SelectorConfig::new(
                "laserparts.ru",
                "https://www.laserparts.ru/search",
                "query",
                ".product-item",
                ".product-title",
                ".price",
            ),
        )
    }

    /// tze1.ru search listing.
    pub fn tze1(fetcher: HttpFetcher) -> AdapterResult<Self> {
        Self::new(
            fetcher,
            SelectorConfig::new(
                "tze1.ru",
                "https://tze1.ru/search",
                "search",
                ".product-thumb",
                ".caption a",
                ".price",
            ),
        )
    }

    /// zipzip.ru search listing.
    pub fn zipzip(fetcher: HttpFetcher) -> AdapterResult<Self> {
        Self::new(
            fetcher,
            SelectorConfig::new(
                "zipzip.ru",
                "https://zipzip.ru/search/",
                "q",
                ".item_info",
                ".item-title",
                ".price_value",
            ),
        )
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(&self.config.query_param, query);
        url
    }

    /// Parse one results page into candidates.
    ///
    /// Runs synchronously between awaits: `scraper::Html` holds `Rc`
    /// internals and must not live across an await point.
    fn parse_listing(&self, html: &str, search_url: &Url) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let mut candidates = Vec::new();

        for tile in document.select(&self.item_sel) {
            let Some(name) = self.select_text(tile, &self.name_sel) else {
                continue;
            };
            let Some(price_text) = self.select_text(tile, &self.price_sel) else {
                continue;
            };
            let Some(price) = price::parse_price_cell(&price_text) else {
                continue;
            };

            let url = tile
                .select(&self.link_sel)
                .find_map(|a| a.value().attr("href"))
                .and_then(|href| self.base.join(href).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| search_url.to_string());

            candidates.push(Candidate::new(name, price, url, self.config.site.clone()));
        }

        candidates
    }

    fn select_text(&self, tile: ElementRef<'_>, selector: &Selector) -> Option<String> {
        let text = tile
            .select(selector)
            .next()?
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        (!text.is_empty()).then_some(text)
    }
}

fn parse_selector(site: &str, selector: &str) -> AdapterResult<Selector> {
    Selector::parse(selector).map_err(|e| AdapterError::Decode {
        site: site.to_string(),
        reason: format!("bad selector {selector:?}: {e}"),
    })
}

/// Visible text of a whole page, whitespace-collapsed per block.
fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::new();
    for node in document.root_element().text() {
        let trimmed = node.trim();
        if !trimmed.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(trimmed);
        }
    }
    out
}

#[async_trait]
impl SiteAdapter for SelectorAdapter {
    fn site(&self) -> &str {
        &self.config.site
    }

    async fn search(&self, query: &str) -> AdapterResult<Vec<Candidate>> {
        let url = self.search_url(query);
        let body = self.fetcher.get_text(url.as_str(), &self.config.site).await?;
        let candidates = self.parse_listing(&body, &url);
        debug!(
            site = %self.config.site,
            query = %query,
            count = candidates.len(),
            "listing parsed"
        );
        Ok(candidates)
    }

    async fn page_text(&self, query: &str) -> AdapterResult<Option<String>> {
        let url = self.search_url(query);
        let body = self.fetcher.get_text(url.as_str(), &self.config.site).await?;
        let text = visible_text(&body);
        Ok((!text.is_empty()).then_some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> SelectorAdapter {
        SelectorAdapter::laserparts(HttpFetcher::new().unwrap()).unwrap()
    }

    const LISTING: &str = r#"
        <html><body>
            <div class="product-item">
                <a href="/products/rm1-1740"><span class="product-title">Термоплёнка RM1-1740-040CN</span></a>
                <div class="price">990 руб.</div>
            </div>
            <div class="product-item">
                <span class="product-title">Без цены</span>
            </div>
            <div class="product-item">
                <a href="https://www.laserparts.ru/products/ce285a">
                    <span class="product-title">Картридж CE285A</span>
                </a>
                <div class="price">1 540,00 руб.</div>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_extracts_tiles() {
        let a = adapter();
        let url = a.search_url("термоплёнка");
        let candidates = a.parse_listing(LISTING, &url);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Термоплёнка RM1-1740-040CN");
        assert_eq!(candidates[0].price, 990.0);
        assert_eq!(
            candidates[0].source_url,
            "https://www.laserparts.ru/products/rm1-1740"
        );
        assert_eq!(candidates[1].price, 1540.0);
        assert_eq!(candidates[1].source_site, "laserparts.ru");
    }

    #[test]
    fn test_tile_without_link_falls_back_to_search_url() {
        let html = r#"
            <div class="product-item">
                <span class="product-title">Вал резиновый</span>
                <div class="price">250 руб</div>
            </div>
        "#;
        let a = adapter();
        let url = a.search_url("вал");
        let candidates = a.parse_listing(html, &url);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source_url, url.to_string());
    }

    #[test]
    fn test_search_url_encodes_cyrillic() {
        let url = adapter().search_url("Термоплёнка RM1-1740");
        assert!(url.as_str().starts_with("https://www.laserparts.ru/search?query="));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_visible_text_strips_markup() {
        let text = visible_text("<html><body><h1>Поиск</h1><p>990 руб.</p></body></html>");
        assert_eq!(text, "Поиск\n990 руб.");
    }
}
