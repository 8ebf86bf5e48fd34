//! Run rewriting: splicing replacement values into run texts.
//!
//! The positional pass ([`rewrite`]) works on spans found in the paragraph's
//! concatenated text and handles tokens split across runs. The residual pass
//! ([`residual_pass`]) is a plain literal replacement inside single runs and
//! only catches what the positional pass could not resolve.

use super::index::{CharRunIndex, ResolvedSpan};
use super::scanner::{token_for, PlaceholderSpan};
use super::{PlaceholderValues, RunText};
use std::collections::BTreeMap;
use std::ops::Range;

/// Byte ranges of inserted values, keyed by run ordinal.
pub type InsertedRanges = BTreeMap<usize, Vec<Range<usize>>>;

/// Outcome of a positional rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Spans replaced
    pub replaced: usize,
    /// Spans skipped because they could not be resolved or applied
    pub skipped: usize,
    /// Where each value was inserted, valid for the rewritten run texts
    pub inserted: InsertedRanges,
}

impl RewriteOutcome {
    /// Record a value of `len` bytes applied at `span`.
    ///
    /// Spans are applied rightmost first, so ranges recorded earlier lie at
    /// or after the span's end and only need shifting by the bytes the
    /// rewrite removed or added in front of them.
    fn record(&mut self, span: &ResolvedSpan, len: usize) {
        let (first, last) = (span.first, span.last);
        let removed = if span.is_single_run() {
            last.end_offset() - first.offset
        } else {
            last.end_offset()
        };
        let added = if span.is_single_run() { len } else { 0 };
        if let Some(ranges) = self.inserted.get_mut(&last.run) {
            for range in ranges.iter_mut() {
                range.start = range.start - removed + added;
                range.end = range.end - removed + added;
            }
        }
        self.inserted
            .entry(first.run)
            .or_default()
            .insert(0, first.offset..first.offset + len);
    }

    /// Whether any value landed in the given run.
    pub fn filled(&self, run: usize) -> bool {
        self.inserted.get(&run).is_some_and(|ranges| !ranges.is_empty())
    }
}

/// Replace one resolved span with `replacement`.
///
/// Single-run spans are spliced in place. For multi-run spans the first run
/// keeps its text before the token and receives the whole replacement, runs
/// strictly between are emptied (not removed), and the last run keeps only
/// the text after the token.
///
/// Returns `false` without touching any run when the span does not fit the
/// current run texts.
pub fn apply_replacement<R: RunText>(
    runs: &mut [R],
    span: &ResolvedSpan,
    replacement: &str,
) -> bool {
    let (first, last) = (span.first, span.last);
    if first.run > last.run || last.run >= runs.len() {
        return false;
    }

    if span.is_single_run() {
        let text = runs[first.run].text();
        let (Some(before), Some(after)) = (
            text.get(..first.offset),
            text.get(last.end_offset()..),
        ) else {
            return false;
        };
        if first.offset > last.offset {
            return false;
        }
        let updated = format!("{}{}{}", before, replacement, after);
        runs[first.run].set_text(updated);
        return true;
    }

    let (Some(head), Some(tail)) = (
        runs[first.run].text().get(..first.offset),
        runs[last.run].text().get(last.end_offset()..),
    ) else {
        return false;
    };
    let head = format!("{}{}", head, replacement);
    let tail = tail.to_string();

    runs[first.run].set_text(head);
    for run in &mut runs[first.run + 1..last.run] {
        run.set_text(String::new());
    }
    runs[last.run].set_text(tail);
    true
}

/// Replace every span that has a value, rightmost first.
///
/// The character index is built once from the runs as given. Processing in
/// descending start order keeps it valid: each rewrite only changes text at
/// or after the span being rewritten, never text a pending span refers to.
pub fn rewrite<R: RunText>(
    runs: &mut [R],
    spans: &[PlaceholderSpan<'_>],
    values: &PlaceholderValues,
) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();
    if spans.is_empty() {
        return outcome;
    }

    let index = CharRunIndex::build(runs);
    let mut ordered: Vec<&PlaceholderSpan<'_>> = spans.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    for span in ordered {
        let Some(value) = values.get(span.name) else {
            continue;
        };

        let resolved = match index.resolve(span.start, span.end) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::debug!("Skipping placeholder {}: {}", span.token, e);
                outcome.skipped += 1;
                continue;
            }
        };

        if apply_replacement(runs, &resolved, value) {
            outcome.replaced += 1;
            outcome.record(&resolved, value.len());
        } else {
            log::debug!(
                "Skipping placeholder {}: runs {}..={} changed underneath the index",
                span.token,
                resolved.first.run,
                resolved.last.run
            );
            outcome.skipped += 1;
        }
    }

    outcome
}

/// Literal `{{name}}` replacement inside individual runs.
///
/// Every run is scanned, but the byte ranges in `inserted` (values placed by
/// the positional pass) are copied through verbatim so inserted values are
/// never rescanned. Each run is scanned once, left to right, so a value
/// inserted here is not rescanned either.
///
/// Returns the number of replacements made.
pub fn residual_pass<R: RunText>(
    runs: &mut [R],
    values: &PlaceholderValues,
    inserted: &InsertedRanges,
) -> usize {
    if values.is_empty() {
        return 0;
    }

    let tokens: Vec<(String, &str)> = values
        .iter()
        .map(|(name, value)| (token_for(name), value))
        .collect();

    let mut total = 0;
    for (ordinal, run) in runs.iter_mut().enumerate() {
        if !run.text().contains("{{") {
            continue;
        }
        let protected = inserted.get(&ordinal).map_or(&[][..], Vec::as_slice);
        let (updated, count) = replace_outside(run.text(), protected, &tokens);
        if count > 0 {
            log::debug!("Residual pass replaced {} token(s) in run {}", count, ordinal);
            run.set_text(updated);
            total += count;
        }
    }
    total
}

/// Apply [`replace_literal_tokens`] to the text between `protected` ranges.
fn replace_outside(
    text: &str,
    protected: &[Range<usize>],
    tokens: &[(String, &str)],
) -> (String, usize) {
    if protected.is_empty() {
        return replace_literal_tokens(text, tokens);
    }

    let mut ranges = protected.to_vec();
    ranges.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut cursor = 0;
    for range in ranges {
        let (Some(gap), Some(kept)) = (
            text.get(cursor..range.start),
            text.get(range.start..range.end),
        ) else {
            // Ranges out of step with the text: leave the run as it is.
            return (text.to_string(), 0);
        };
        let (replaced, n) = replace_literal_tokens(gap, tokens);
        out.push_str(&replaced);
        out.push_str(kept);
        count += n;
        cursor = range.end;
    }
    let (replaced, n) = replace_literal_tokens(text.get(cursor..).unwrap_or_default(), tokens);
    out.push_str(&replaced);

    (out, count + n)
}

fn replace_literal_tokens(text: &str, tokens: &[(String, &str)]) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut count = 0;
    let mut rest = text;

    while let Some(pos) = rest.find("{{") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match tokens
            .iter()
            .find(|(token, _)| candidate.starts_with(token.as_str()))
        {
            Some((token, value)) => {
                out.push_str(value);
                rest = &candidate[token.len()..];
                count += 1;
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);

    (out, count)
}
