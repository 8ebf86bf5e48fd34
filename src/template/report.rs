//! Statistics collected while filling a template.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a fill did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    /// Paragraphs handed to the processor
    pub paragraphs_visited: usize,

    /// Placeholders replaced by the positional pass
    pub placeholders_replaced: usize,

    /// Tokens replaced by the residual pass
    pub residual_replacements: usize,

    /// Known placeholders whose span could not be resolved
    pub skipped_spans: usize,

    /// Placeholder names found without a value, left verbatim
    pub unknown_placeholders: BTreeSet<String>,
}

impl FillReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total replacements from both passes.
    pub fn total_replacements(&self) -> usize {
        self.placeholders_replaced + self.residual_replacements
    }

    /// Whether anything in the document changed.
    pub fn changed(&self) -> bool {
        self.total_replacements() > 0
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: FillReport) {
        self.paragraphs_visited += other.paragraphs_visited;
        self.placeholders_replaced += other.placeholders_replaced;
        self.residual_replacements += other.residual_replacements;
        self.skipped_spans += other.skipped_spans;
        self.unknown_placeholders.extend(other.unknown_placeholders);
    }
}
