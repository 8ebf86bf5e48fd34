//! Document-level types.

use super::{Block, Paragraph, Section, Table};
use serde::{Deserialize, Serialize};

/// A templated document.
///
/// The body is a flat sequence of blocks; sections only contribute their
/// header and footer regions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Body content in document order
    pub body: Vec<Block>,

    /// Sections in document order
    pub sections: Vec<Section>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body paragraph.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push(Block::Paragraph(paragraph));
    }

    /// Add a body table.
    pub fn add_table(&mut self, table: Table) {
        self.body.push(Block::Table(table));
    }

    /// Add a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Paragraphs directly in the body.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(Block::as_paragraph)
    }

    /// Tables directly in the body.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(Block::as_table)
    }

    /// Check if the document has no body content.
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Get plain text of the body paragraphs, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.full_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
