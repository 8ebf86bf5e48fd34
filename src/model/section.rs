//! Section-level types: blocks and header/footer regions.

use super::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// A content block in the body, a header/footer, or a table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),
}

impl Block {
    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Borrow the paragraph, if this block is one.
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }

    /// Mutably borrow the paragraph, if this block is one.
    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        }
    }

    /// Borrow the table, if this block is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        }
    }

    /// Mutably borrow the table, if this block is one.
    pub fn as_table_mut(&mut self) -> Option<&mut Table> {
        match self {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        }
    }
}

/// A header or footer region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderFooter {
    /// Content blocks in document order
    pub blocks: Vec<Block>,
}

impl HeaderFooter {
    /// Create an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a paragraph to the region.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table to the region.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Check if the region has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A document section with its header and footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Header region
    pub header: HeaderFooter,

    /// Footer region
    pub footer: HeaderFooter,
}

impl Section {
    /// Create a section with empty header and footer.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_variants() {
        let block = Block::Paragraph(Paragraph::with_text("x"));
        assert!(block.is_paragraph());
        assert!(!block.is_table());
        assert!(block.as_table().is_none());

        let block = Block::Table(Table::new());
        assert!(block.is_table());
        assert!(block.as_paragraph().is_none());
    }

    #[test]
    fn test_header_footer() {
        let mut header = HeaderFooter::new();
        assert!(header.is_empty());
        header.add_paragraph(Paragraph::with_text("Page header"));
        header.add_table(Table::new());
        assert_eq!(header.blocks.len(), 2);
    }
}
