//! Document model types for templated documents.
//!
//! This module defines the in-memory shape the templating core works on:
//! a body of blocks, per-section header/footer regions, tables, paragraphs
//! and formatted text runs. It is format-agnostic; the `docx` module maps
//! Word packages onto it.

mod document;
mod paragraph;
mod section;
mod table;

pub use document::Document;
pub(crate) use paragraph::TextSlotId;
pub use paragraph::{Paragraph, RunFormat, TextRun};
pub use section::{Block, HeaderFooter, Section};
pub use table::{Table, TableCell, TableRow};
