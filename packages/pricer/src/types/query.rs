//! Parsed form of one input line.

use serde::{Deserialize, Serialize};

/// Structured view of a query line after identifier extraction.
///
/// Input lines look like `"100 листов RM1-1740-040CN/RM1-1740-000CN"`:
/// an optional quantity or attribute, a free-text description, and zero
/// or more slash-separated manufacturer codes at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// First word of the line after the identifier suffix is removed
    /// (usually a quantity like `"100"`), normalized.
    pub quantity: String,

    /// Remaining description text, normalized.
    pub description: String,

    /// Identifier tokens in left-to-right order. May be empty.
    pub identifiers: Vec<String>,
}

impl ParsedQuery {
    /// True when parsing recovered nothing usable from the line.
    ///
    /// The ranker still runs on such queries and degrades to a
    /// no-match result rather than failing.
    pub fn is_empty(&self) -> bool {
        self.quantity.is_empty() && self.description.is_empty() && self.identifiers.is_empty()
    }

    /// Description plus quantity joined back for fuzzy comparison.
    pub fn name_text(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.quantity.is_empty() {
            parts.push(self.quantity.as_str());
        }
        if !self.description.is_empty() {
            parts.push(self.description.as_str());
        }
        parts.join(" ")
    }
}
