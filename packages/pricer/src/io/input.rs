//! Input price-list reader.

use std::path::Path;

use tracing::info;

use crate::error::PipelineResult;

/// Read query lines from the first column of a CSV file.
///
/// Price lists arrive in whatever shape the customer exported: with or
/// without an `item` header, with trailing columns, with blank rows.
/// Everything past the first column is ignored.
pub fn read_queries(path: impl AsRef<Path>) -> PipelineResult<Vec<String>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut queries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(cell) = record.get(0) else {
            continue;
        };
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        // Header row from a previous export of ours.
        if queries.is_empty() && cell.eq_ignore_ascii_case("item") {
            continue;
        }
        queries.push(cell.to_string());
    }

    info!(path = %path.display(), count = queries.len(), "queries loaded");
    Ok(queries)
}
