//! Placeholder extraction and in-place substitution.
//!
//! A paragraph's visible text is split across independently formatted runs
//! and a `{{name}}` token may straddle any number of run boundaries. The
//! pipeline per paragraph is:
//!
//! 1. [`scanner`] finds token spans in the concatenated text,
//! 2. [`index`] maps each character back to its run and resolves spans,
//! 3. [`rewrite`] splices values into the owning runs, rightmost first,
//!    then runs a literal residual pass,
//!
//! orchestrated by [`processor`] and applied document-wide by [`walker`].
//!
//! # Example
//!
//! ```
//! use docfill::model::Paragraph;
//! use docfill::template::{process, PlaceholderValues};
//!
//! let mut p = Paragraph::from_fragments(["Dear {{cli", "ent}},"]);
//! let values = PlaceholderValues::new().with("client", "ACME");
//! process(&mut p, &values);
//! assert_eq!(p.full_text(), "Dear ACME,");
//! ```

pub mod index;
mod options;
pub mod processor;
mod report;
pub mod rewrite;
pub mod scanner;
mod values;
pub mod walker;

pub use index::{CharPosition, CharRunIndex, ResolvedSpan, SpanError};
pub use options::{ErrorMode, FillOptions};
pub use processor::{extract, extract_into, process, process_with_options};
pub use report::FillReport;
pub use rewrite::{residual_pass, rewrite, InsertedRanges, RewriteOutcome};
pub use scanner::{scan, PlaceholderSpan, Tokens};
pub use values::PlaceholderValues;
pub use walker::{visit_paragraphs, visit_paragraphs_mut, CellAddress, Location, Region};

use crate::error::{Error, Result};
use crate::model::{Document, Paragraph, TextRun};
use std::collections::BTreeSet;

/// Text access to a run. Formatting is out of reach on purpose.
pub trait RunText {
    /// Current text.
    fn text(&self) -> &str;

    /// Replace the text.
    fn set_text(&mut self, text: String);
}

/// An ordered run sequence, such as a paragraph.
pub trait RunSequence {
    /// Run type
    type Run: RunText;

    /// Runs in order.
    fn runs(&self) -> &[Self::Run];

    /// Mutable runs in order. The sequence length must not change.
    fn runs_mut(&mut self) -> &mut [Self::Run];

    /// Concatenation of all run texts.
    fn full_text(&self) -> String {
        self.runs().iter().map(RunText::text).collect()
    }
}

impl RunText for TextRun {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

impl RunText for String {
    fn text(&self) -> &str {
        self
    }

    fn set_text(&mut self, text: String) {
        *self = text;
    }
}

impl RunSequence for Paragraph {
    type Run = TextRun;

    fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    fn runs_mut(&mut self) -> &mut [TextRun] {
        &mut self.runs
    }
}

impl<R: RunText> RunSequence for Vec<R> {
    type Run = R;

    fn runs(&self) -> &[R] {
        self
    }

    fn runs_mut(&mut self) -> &mut [R] {
        self
    }
}

impl<R: RunText> RunSequence for [R] {
    type Run = R;

    fn runs(&self) -> &[R] {
        self
    }

    fn runs_mut(&mut self) -> &mut [R] {
        self
    }
}

/// Sorted, deduplicated placeholder names used anywhere in a document.
pub fn collect_placeholders(doc: &Document) -> Vec<String> {
    let mut names = BTreeSet::new();
    visit_paragraphs(doc, |_, paragraph| extract_into(paragraph, &mut names));
    names.into_iter().collect()
}

/// Fill every templatable paragraph of a document in place.
///
/// In strict mode the document is checked first and left untouched when
/// any placeholder has no value.
pub fn fill_document(
    doc: &mut Document,
    values: &PlaceholderValues,
    options: &FillOptions,
) -> Result<FillReport> {
    if options.error_mode == ErrorMode::Strict {
        let missing: Vec<String> = collect_placeholders(doc)
            .into_iter()
            .filter(|name| !values.contains(name))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingValues(missing));
        }
    }

    let mut report = FillReport::new();
    visit_paragraphs_mut(doc, |location, paragraph| {
        let result = process_with_options(paragraph, values, options);
        if result.skipped_spans > 0 {
            log::debug!(
                "{} span(s) skipped in paragraph at {:?}",
                result.skipped_spans,
                location
            );
        }
        report.merge(result);
    });

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, Table, TableRow};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::from_fragments(["Dear {{na", "me}},"]));
        let mut table = Table::new();
        table.add_row(TableRow::from_strings(["{{amount}}", "{{name}}"]));
        doc.add_table(table);
        let mut section = Section::new();
        section.header.add_paragraph(Paragraph::with_text("{{company}}"));
        doc.add_section(section);
        doc
    }

    #[test]
    fn test_collect_placeholders_sorted_dedup() {
        let doc = sample();
        assert_eq!(collect_placeholders(&doc), vec!["amount", "company", "name"]);
    }

    #[test]
    fn test_fill_document() {
        let mut doc = sample();
        let values = PlaceholderValues::new()
            .with("name", "Ada")
            .with("amount", "42")
            .with("company", "ACME");
        let report = fill_document(&mut doc, &values, &FillOptions::default()).unwrap();

        assert_eq!(report.placeholders_replaced, 4);
        assert_eq!(report.paragraphs_visited, 4);
        assert!(collect_placeholders(&doc).is_empty());
        assert_eq!(doc.plain_text(), "Dear Ada,");
    }

    #[test]
    fn test_strict_mode_leaves_document_untouched() {
        let mut doc = sample();
        let original = doc.clone();
        let values = PlaceholderValues::new().with("name", "Ada");
        let result = fill_document(&mut doc, &values, &FillOptions::new().strict());

        match result {
            Err(Error::MissingValues(names)) => assert_eq!(names, vec!["amount", "company"]),
            other => panic!("expected MissingValues, got {:?}", other),
        }
        assert_eq!(doc, original);
    }

    #[test]
    fn test_empty_values_round_trip() {
        let mut doc = sample();
        let original = doc.clone();
        fill_document(&mut doc, &PlaceholderValues::new(), &FillOptions::default()).unwrap();
        assert_eq!(doc, original);
    }
}
