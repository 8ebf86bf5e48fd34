//! Character → run resolution for a paragraph's concatenated text.

use super::RunText;
use thiserror::Error;

/// Where one character of the concatenated text lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharPosition {
    /// Ordinal of the owning run
    pub run: usize,
    /// Byte offset of the character inside the run's text
    pub offset: usize,
    /// UTF-8 width of the character in bytes
    pub width: usize,
}

impl CharPosition {
    /// Byte offset just past the character inside the run's text.
    pub fn end_offset(&self) -> usize {
        self.offset + self.width
    }
}

/// Table mapping every character of a run sequence's concatenated text to
/// its owning run.
///
/// Positions are only valid for the run texts the index was built from.
/// Empty runs own no characters and never appear in the table.
#[derive(Debug, Clone, Default)]
pub struct CharRunIndex {
    positions: Vec<CharPosition>,
}

impl CharRunIndex {
    /// Build the index for a run sequence.
    pub fn build<R: RunText>(runs: &[R]) -> Self {
        let capacity = runs.iter().map(|r| r.text().len()).sum();
        let mut positions = Vec::with_capacity(capacity);
        for (run, r) in runs.iter().enumerate() {
            for (offset, ch) in r.text().char_indices() {
                positions.push(CharPosition {
                    run,
                    offset,
                    width: ch.len_utf8(),
                });
            }
        }
        Self { positions }
    }

    /// Number of indexed characters.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if no characters are indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of the `i`-th character.
    pub fn get(&self, i: usize) -> Option<CharPosition> {
        self.positions.get(i).copied()
    }

    /// Resolve a `[start, end)` character span to its first and last
    /// characters' positions.
    pub fn resolve(&self, start: usize, end: usize) -> Result<ResolvedSpan, SpanError> {
        if start >= end {
            return Err(SpanError::Empty { start, end });
        }
        match (self.get(start), self.get(end - 1)) {
            (Some(first), Some(last)) => Ok(ResolvedSpan { first, last }),
            _ => Err(SpanError::OutOfRange {
                start,
                end,
                len: self.len(),
            }),
        }
    }
}

/// A span mapped onto the runs that own its first and last characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Position of the first character
    pub first: CharPosition,
    /// Position of the last character
    pub last: CharPosition,
}

impl ResolvedSpan {
    /// True when the whole span lives in one run.
    pub fn is_single_run(&self) -> bool {
        self.first.run == self.last.run
    }

    /// Number of runs the span touches, counting any in between.
    pub fn run_count(&self) -> usize {
        self.last.run - self.first.run + 1
    }
}

/// Why a span could not be resolved. Callers skip such spans.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// Span lies (partly) outside the indexed text.
    #[error("span {start}..{end} is out of range (indexed length {len})")]
    OutOfRange {
        /// Span start
        start: usize,
        /// Span end (exclusive)
        end: usize,
        /// Indexed character count
        len: usize,
    },

    /// Span covers no characters.
    #[error("span {start}..{end} is empty")]
    Empty {
        /// Span start
        start: usize,
        /// Span end (exclusive)
        end: usize,
    },
}
