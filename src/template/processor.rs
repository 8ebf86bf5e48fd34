//! Per-paragraph placeholder extraction and replacement.

use super::rewrite::{residual_pass, rewrite};
use super::scanner::{scan, PlaceholderSpan};
use super::{FillOptions, FillReport, PlaceholderValues, RunSequence};
use std::collections::BTreeSet;

/// Replace the placeholders of one paragraph with default options.
pub fn process<P>(paragraph: &mut P, values: &PlaceholderValues) -> FillReport
where
    P: RunSequence + ?Sized,
{
    process_with_options(paragraph, values, &FillOptions::default())
}

/// Replace the placeholders of one paragraph.
///
/// Known placeholders are replaced once each; unknown ones stay verbatim and
/// are listed in the report. Only run text changes, never run formatting or
/// the number of runs.
pub fn process_with_options<P>(
    paragraph: &mut P,
    values: &PlaceholderValues,
    options: &FillOptions,
) -> FillReport
where
    P: RunSequence + ?Sized,
{
    let mut report = FillReport {
        paragraphs_visited: 1,
        ..FillReport::default()
    };

    let text = paragraph.full_text();
    if text.is_empty() {
        return report;
    }

    let mut known: Vec<PlaceholderSpan<'_>> = Vec::new();
    for span in scan(&text) {
        if values.contains(span.name) {
            known.push(span);
        } else {
            report.unknown_placeholders.insert(span.name.to_string());
        }
    }

    let runs = paragraph.runs_mut();
    let outcome = rewrite(runs, &known, values);
    report.placeholders_replaced = outcome.replaced;
    report.skipped_spans = outcome.skipped;

    if options.residual_pass {
        report.residual_replacements = residual_pass(runs, values, &outcome.inserted);
    }

    report
}

/// Placeholder names used in a paragraph, regardless of run boundaries.
pub fn extract<P>(paragraph: &P) -> BTreeSet<String>
where
    P: RunSequence + ?Sized,
{
    let mut names = BTreeSet::new();
    extract_into(paragraph, &mut names);
    names
}

/// Add the placeholder names used in a paragraph to `names`.
pub fn extract_into<P>(paragraph: &P, names: &mut BTreeSet<String>)
where
    P: RunSequence + ?Sized,
{
    let text = paragraph.full_text();
    names.extend(scan(&text).map(|span| span.name.to_string()));
}
