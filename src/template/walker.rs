//! Deterministic traversal of every templatable paragraph in a document.
//!
//! Order: body paragraphs; then each body table's cells row by row; then
//! for each section the header paragraphs, header table cells, footer
//! paragraphs and footer table cells. Tables nested inside cells are not
//! traversed.

use crate::model::{Block, Document, Paragraph};
use serde::{Deserialize, Serialize};

/// The region a paragraph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "region", content = "section", rename_all = "snake_case")]
pub enum Region {
    /// Document body
    Body,
    /// Header of the given section
    Header(usize),
    /// Footer of the given section
    Footer(usize),
}

/// Address of a table cell within a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAddress {
    /// Table ordinal among the region's top-level tables
    pub table: usize,
    /// Row ordinal
    pub row: usize,
    /// Cell ordinal within the row
    pub cell: usize,
}

/// Where a visited paragraph lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Body, header or footer
    pub region: Region,
    /// Enclosing table cell, if any
    pub cell: Option<CellAddress>,
    /// Paragraph ordinal within the region's top level or the cell
    pub paragraph: usize,
}

/// Visit every templatable paragraph in traversal order.
pub fn visit_paragraphs<'a, F>(doc: &'a Document, mut f: F)
where
    F: FnMut(Location, &'a Paragraph),
{
    walk_blocks(&doc.body, Region::Body, &mut f);
    for (index, section) in doc.sections.iter().enumerate() {
        walk_blocks(&section.header.blocks, Region::Header(index), &mut f);
        walk_blocks(&section.footer.blocks, Region::Footer(index), &mut f);
    }
}

/// Visit every templatable paragraph mutably, in the same order as
/// [`visit_paragraphs`].
pub fn visit_paragraphs_mut<F>(doc: &mut Document, mut f: F)
where
    F: FnMut(Location, &mut Paragraph),
{
    walk_blocks_mut(&mut doc.body, Region::Body, &mut f);
    for (index, section) in doc.sections.iter_mut().enumerate() {
        walk_blocks_mut(&mut section.header.blocks, Region::Header(index), &mut f);
        walk_blocks_mut(&mut section.footer.blocks, Region::Footer(index), &mut f);
    }
}

/// Collect every templatable paragraph with its location.
pub fn paragraphs(doc: &Document) -> Vec<(Location, &Paragraph)> {
    let mut out = Vec::new();
    visit_paragraphs(doc, |location, paragraph| out.push((location, paragraph)));
    out
}

fn walk_blocks<'a, F>(blocks: &'a [Block], region: Region, f: &mut F)
where
    F: FnMut(Location, &'a Paragraph),
{
    for (paragraph, p) in blocks.iter().filter_map(Block::as_paragraph).enumerate() {
        f(
            Location {
                region,
                cell: None,
                paragraph,
            },
            p,
        );
    }

    for (table, t) in blocks.iter().filter_map(Block::as_table).enumerate() {
        for (row, r) in t.rows.iter().enumerate() {
            for (cell, c) in r.cells.iter().enumerate() {
                let address = CellAddress { table, row, cell };
                for (paragraph, p) in c.paragraphs().enumerate() {
                    f(
                        Location {
                            region,
                            cell: Some(address),
                            paragraph,
                        },
                        p,
                    );
                }
            }
        }
    }
}

fn walk_blocks_mut<F>(blocks: &mut [Block], region: Region, f: &mut F)
where
    F: FnMut(Location, &mut Paragraph),
{
    for (paragraph, p) in blocks
        .iter_mut()
        .filter_map(Block::as_paragraph_mut)
        .enumerate()
    {
        f(
            Location {
                region,
                cell: None,
                paragraph,
            },
            p,
        );
    }

    for (table, t) in blocks.iter_mut().filter_map(Block::as_table_mut).enumerate() {
        for (row, r) in t.rows.iter_mut().enumerate() {
            for (cell, c) in r.cells.iter_mut().enumerate() {
                let address = CellAddress { table, row, cell };
                for (paragraph, p) in c.paragraphs_mut().enumerate() {
                    f(
                        Location {
                            region,
                            cell: Some(address),
                            paragraph,
                        },
                        p,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Section, Table, TableCell, TableRow};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("body 1"));
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![TableCell::with_paragraphs(vec![
            Paragraph::with_text("cell a"),
            Paragraph::with_text("cell b"),
        ])]));
        doc.add_table(table);
        doc.add_paragraph(Paragraph::with_text("body 2"));

        let mut section = Section::new();
        section.header.add_paragraph(Paragraph::with_text("header"));
        let mut header_table = Table::new();
        header_table.add_row(TableRow::from_strings(["header cell"]));
        section.header.add_table(header_table);
        section.footer.add_paragraph(Paragraph::with_text("footer"));
        doc.add_section(section);
        doc
    }

    #[test]
    fn test_traversal_order() {
        let doc = sample();
        let texts: Vec<String> = paragraphs(&doc)
            .into_iter()
            .map(|(_, p)| p.full_text())
            .collect();

        assert_eq!(
            texts,
            vec![
                "body 1",
                "body 2",
                "cell a",
                "cell b",
                "header",
                "header cell",
                "footer"
            ]
        );
    }

    #[test]
    fn test_locations() {
        let doc = sample();
        let visited = paragraphs(&doc);

        assert_eq!(
            visited[3].0,
            Location {
                region: Region::Body,
                cell: Some(CellAddress {
                    table: 0,
                    row: 0,
                    cell: 0
                }),
                paragraph: 1,
            }
        );
        assert_eq!(visited[6].0.region, Region::Footer(0));
    }

    #[test]
    fn test_mut_traversal_matches() {
        let mut doc = sample();
        let expected: Vec<Location> = paragraphs(&doc).into_iter().map(|(l, _)| l).collect();

        let mut seen = Vec::new();
        visit_paragraphs_mut(&mut doc, |location, paragraph| {
            paragraph.add_text("!");
            seen.push(location);
        });

        assert_eq!(seen, expected);
        assert_eq!(doc.paragraphs().next().unwrap().full_text(), "body 1!");
    }
}
