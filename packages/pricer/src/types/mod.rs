//! Core data types shared across the matching pipeline.

pub mod candidate;
pub mod config;
pub mod query;
pub mod result;

pub use candidate::Candidate;
pub use config::{BatchConfig, MatchConfig};
pub use query::ParsedQuery;
pub use result::{BatchSummary, MatchResult, MatchedBy};
