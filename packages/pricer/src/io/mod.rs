//! CSV input and output tables.

mod input;
mod output;

pub use input::read_queries;
pub use output::{read_processed, write_results, ResumeState};
