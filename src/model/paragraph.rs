//! Paragraph and run-level types.

use serde::{Deserialize, Serialize};

/// A paragraph: an ordered sequence of independently formatted runs.
///
/// The visible text of a paragraph is the concatenation of its run texts;
/// see [`Paragraph::full_text`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Text runs in document order
    pub runs: Vec<TextRun>,

    /// Paragraph style identifier (e.g. `Heading1`), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph holding a single unformatted run.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph with one unformatted run per fragment.
    ///
    /// Handy for reproducing the run fragmentation word processors produce
    /// around spell-check marks and revision boundaries.
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            runs: fragments.into_iter().map(TextRun::new).collect(),
            style: None,
        }
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.runs.push(TextRun::new(text));
    }

    /// Add a formatted text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.runs.push(run);
    }

    /// Concatenation of all run texts in order.
    pub fn full_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Number of runs, including empty ones.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(TextRun::is_empty)
    }
}

/// A run of text sharing one formatting definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Formatting, carried through edits untouched
    pub format: RunFormat,

    /// Origin of this run in a loaded package, used for write-back
    #[serde(skip)]
    pub(crate) slot: Option<TextSlotId>,
}

impl TextRun {
    /// Create a new text run with default formatting.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: RunFormat::default(),
            slot: None,
        }
    }

    /// Create a text run with the given formatting.
    pub fn formatted(text: impl Into<String>, format: RunFormat) -> Self {
        Self {
            text: text.into(),
            format,
            slot: None,
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::formatted(
            text,
            RunFormat {
                bold: true,
                ..Default::default()
            },
        )
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::formatted(
            text,
            RunFormat {
                italic: true,
                ..Default::default()
            },
        )
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Run formatting.
///
/// Placeholder substitution never reads or writes these fields. For runs
/// loaded from a package, `raw` holds the original run properties markup and
/// the decoded flags are informational.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunFormat {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Font name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,

    /// Font size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    /// Text color (hex, e.g. "FF0000")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Highlight color name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,

    /// Source run properties markup, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl RunFormat {
    /// Check if any character styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.strikethrough
    }
}

/// Location of a run's text element inside a loaded package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TextSlotId {
    /// Index of the XML part
    pub part: usize,
    /// Index of the text element within that part
    pub index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_full_text() {
        let mut p = Paragraph::new();
        p.add_text("Hello ");
        p.add_run(TextRun::bold("world"));
        p.add_text("!");

        assert_eq!(p.full_text(), "Hello world!");
        assert_eq!(p.run_count(), 3);
    }

    #[test]
    fn test_from_fragments() {
        let p = Paragraph::from_fragments(["{{", "na", "me}}"]);
        assert_eq!(p.run_count(), 3);
        assert_eq!(p.full_text(), "{{name}}");
    }

    #[test]
    fn test_empty_runs_are_valid() {
        let p = Paragraph::from_fragments(["", "", ""]);
        assert!(p.is_empty());
        assert_eq!(p.full_text(), "");
    }

    #[test]
    fn test_run_format() {
        let format = RunFormat::default();
        assert!(!format.has_styling());

        let run = TextRun::italic("x");
        assert!(run.format.has_styling());
    }

    #[test]
    fn test_slot_not_serialized() {
        let mut run = TextRun::new("text");
        run.slot = Some(TextSlotId { part: 0, index: 3 });
        let json = serde_json::to_string(&run).unwrap();
        assert!(!json.contains("slot"));
    }
}
