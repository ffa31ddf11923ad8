//! Output table writer and resume support.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PipelineResult;
use crate::types::{MatchResult, MatchedBy};

/// One row of the output table. Prices are kept as formatted strings
/// so the file renders `990.00`, not `990`.
#[derive(Debug, Serialize, Deserialize)]
struct OutputRow {
    item: String,
    price_rub: String,
    source_site: String,
    source_url: String,
    match_score: u8,
}

impl From<&MatchResult> for OutputRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            item: result.query.clone(),
            price_rub: result
                .price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default(),
            source_site: result.source_site.clone().unwrap_or_default(),
            source_url: result.source_url.clone().unwrap_or_default(),
            match_score: result.score,
        }
    }
}

/// Write the full result table, replacing any existing file.
///
/// Header is `item,price_rub,source_site,source_url,match_score`.
/// Unmatched rows are written with empty price, site, and URL so the
/// output always has one row per input item.
pub fn write_results(path: impl AsRef<Path>, results: &[MatchResult]) -> PipelineResult<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(OutputRow::from(result))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = results.len(), "results written");
    Ok(())
}

/// Previously written results, reloaded for an interrupted run.
#[derive(Debug, Default)]
pub struct ResumeState {
    /// Rows carried over from the existing output, in file order.
    pub results: Vec<MatchResult>,
    /// Items that already have a price. Unmatched rows are retried.
    pub priced: HashSet<String>,
}

impl ResumeState {
    pub fn is_priced(&self, query: &str) -> bool {
        self.priced.contains(query)
    }
}

/// Load an existing output file for resume. A missing file is an empty
/// state, not an error.
pub fn read_processed(path: impl AsRef<Path>) -> PipelineResult<ResumeState> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(ResumeState::default());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut state = ResumeState::default();

    for row in reader.deserialize::<OutputRow>() {
        let row = row?;
        if row.item.is_empty() {
            continue;
        }
        let price = row.price_rub.trim().parse::<f64>().ok();
        let matched = price.is_some();
        if matched {
            state.priced.insert(row.item.clone());
        }
        state.results.push(MatchResult {
            query: row.item,
            price,
            source_site: (!row.source_site.is_empty()).then_some(row.source_site),
            source_url: (!row.source_url.is_empty()).then_some(row.source_url),
            matched_name: None,
            score: row.match_score,
            matched_by: if matched {
                MatchedBy::Resumed
            } else {
                MatchedBy::None
            },
        });
    }

    info!(
        path = %path.display(),
        rows = state.results.len(),
        priced = state.priced.len(),
        "resuming from existing output"
    );
    Ok(state)
}
