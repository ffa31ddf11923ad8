//! Batch matching pipeline.

mod batch;
mod cache;

pub use batch::{BatchOutcome, BatchRunner};
pub use cache::MatchCache;
