//! Site adapter implementations.
//!
//! One adapter per source shape: [`ChipdipAdapter`] for the chipdip.ru
//! JSON search API, [`SelectorAdapter`] for scraped HTML listings, and
//! [`RateLimitedAdapter`] to wrap either with a request-rate quota.

mod chipdip;
mod http;
mod rate_limited;
mod selector;

pub use chipdip::ChipdipAdapter;
pub use http::HttpFetcher;
pub use rate_limited::{AdapterExt, RateLimitedAdapter};
pub use selector::{SelectorAdapter, SelectorConfig};
