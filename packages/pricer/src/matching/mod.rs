//! The matching core: text normalization, identifier extraction,
//! similarity scoring, and candidate ranking.
//!
//! Everything here is pure and synchronous. Network I/O stays in the
//! adapters; the pipeline suspends only at the adapter boundary.

pub mod identifiers;
pub mod normalize;
pub mod rank;
pub mod score;

pub use identifiers::{extract_single_identifier, extract_trailing_identifiers, parse_query};
pub use normalize::{normalize, normalize_text};
pub use rank::{rank, rank_with_page, PageContext};
pub use score::score;
