//! DOCX package adapter.
//!
//! Loads the main document part and the header / footer parts referenced by
//! its sections into a [`Document`], and writes edited run text back into
//! the original XML. Everything the model does not cover (styles, images,
//! numbering, text boxes) is carried through byte for byte.

mod package;
mod xml;

pub use package::{parse_relationships, resolve_target, DocxPackage, Relationship};
pub use package::{DOCUMENT_PART, DOCUMENT_RELS};

use crate::detect::is_zip_bytes;
use crate::error::{Error, Result};
use crate::model::{Block, Document, Section, TextRun};
use crate::template::{collect_placeholders, fill_document, FillOptions, FillReport, PlaceholderValues};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::Path;
use xml::{parse_part, write_back, TextSlot};

/// Header / footer reference types in the order their parts are attached.
const REFERENCE_TYPES: [&str; 3] = ["default", "first", "even"];

/// One XML part whose runs are represented in the model.
#[derive(Debug, Clone)]
struct XmlPart {
    name: String,
    xml: String,
    slots: Vec<TextSlot>,
}

/// A loaded DOCX template.
///
/// # Example
///
/// ```no_run
/// use docfill::docx::DocxTemplate;
/// use docfill::template::{FillOptions, PlaceholderValues};
///
/// let mut template = DocxTemplate::open("offer.docx")?;
/// println!("{:?}", template.placeholders());
///
/// let values = PlaceholderValues::new().with("client", "ACME");
/// template.fill(&values, &FillOptions::default())?;
/// template.save("offer_acme.docx")?;
/// # Ok::<(), docfill::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DocxTemplate {
    package: DocxPackage,
    parts: Vec<XmlPart>,
    document: Document,
}

impl DocxTemplate {
    /// Load a template from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening template {}", path.display());
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a template from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Load a template from in-memory bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !is_zip_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        Self::from_package(DocxPackage::from_bytes(data)?)
    }

    /// Load a template from an already opened package.
    pub fn from_package(package: DocxPackage) -> Result<Self> {
        let main = package
            .text(DOCUMENT_PART)?
            .ok_or_else(|| Error::MissingPart(DOCUMENT_PART.to_string()))?;
        let parsed = parse_part(&main, 0)?;

        let mut parts = vec![XmlPart {
            name: DOCUMENT_PART.to_string(),
            xml: main,
            slots: parsed.slots,
        }];
        let mut document = Document {
            body: parsed.blocks,
            sections: Vec::new(),
        };

        let rels = package.relationships(DOCUMENT_RELS)?;
        let mut loaded: HashMap<String, usize> = HashMap::new();

        for refs in &parsed.sections {
            let mut section = Section::new();
            section.header.blocks =
                load_references(&package, &rels, &refs.headers, &mut parts, &mut loaded)?;
            section.footer.blocks =
                load_references(&package, &rels, &refs.footers, &mut parts, &mut loaded)?;
            document.add_section(section);
        }

        log::debug!(
            "Loaded {} part(s), {} section(s)",
            parts.len(),
            document.sections.len()
        );

        Ok(Self {
            package,
            parts,
            document,
        })
    }

    /// The editable document model.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the document model.
    ///
    /// Only text edits of loaded runs are written back; added runs are
    /// ignored on save.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The underlying package.
    pub fn package(&self) -> &DocxPackage {
        &self.package
    }

    /// Names of the XML parts represented in the model, main document first.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.name.as_str())
    }

    /// Sorted, deduplicated placeholder names in the template.
    pub fn placeholders(&self) -> Vec<String> {
        collect_placeholders(&self.document)
    }

    /// Substitute values throughout the document.
    pub fn fill(&mut self, values: &PlaceholderValues, options: &FillOptions) -> Result<FillReport> {
        let report = fill_document(&mut self.document, values, options)?;
        log::debug!(
            "Filled {} placeholder(s) in {} paragraph(s)",
            report.total_replacements(),
            report.paragraphs_visited
        );
        if !report.unknown_placeholders.is_empty() {
            log::debug!(
                "No value for placeholder(s): {}",
                report
                    .unknown_placeholders
                    .iter()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Ok(report)
    }

    /// Serialize the package with the current run text.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut edits: Vec<BTreeMap<usize, String>> = vec![BTreeMap::new(); self.parts.len()];
        for_each_run(&self.document, &mut |run| {
            let Some(slot) = run.slot else {
                return;
            };
            let Some(part) = self.parts.get(slot.part) else {
                return;
            };
            let changed = part
                .slots
                .get(slot.index)
                .is_some_and(|original| original.original != run.text);
            if changed {
                edits[slot.part].insert(slot.index, run.text.clone());
            }
        });

        let mut overrides = HashMap::new();
        for (part, part_edits) in self.parts.iter().zip(&edits) {
            if part_edits.is_empty() {
                continue;
            }
            log::debug!("Rewriting {} text element(s) in {}", part_edits.len(), part.name);
            let xml = write_back(&part.xml, &part.slots, part_edits);
            overrides.insert(part.name.clone(), xml.into_bytes());
        }

        self.package.to_bytes_with(&overrides)
    }

    /// Write the package to a file.
    ///
    /// The file is only created once serialization has succeeded.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), bytes)?;
        log::debug!("Saved {}", path.as_ref().display());
        Ok(())
    }

    /// Consume the template, keeping only the model.
    pub fn into_document(self) -> Document {
        self.document
    }
}

/// Load the parts behind one section's header or footer references.
///
/// A part referenced by several sections belongs to the first one.
fn load_references(
    package: &DocxPackage,
    rels: &HashMap<String, Relationship>,
    references: &[(String, String)],
    parts: &mut Vec<XmlPart>,
    loaded: &mut HashMap<String, usize>,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();

    let mut ordered: Vec<&(String, String)> = references.iter().collect();
    ordered.sort_by_key(|(kind, _)| {
        REFERENCE_TYPES
            .iter()
            .position(|t| t == kind)
            .unwrap_or(REFERENCE_TYPES.len())
    });

    for (kind, id) in ordered {
        let Some(rel) = rels.get(id) else {
            log::warn!("Section references unknown relationship {} ({})", id, kind);
            continue;
        };
        if rel.external {
            continue;
        }
        let name = resolve_target("word", &rel.target);
        if loaded.contains_key(&name) {
            continue;
        }
        let Some(xml) = package.text(&name)? else {
            log::warn!("Referenced part {} is missing", name);
            continue;
        };

        let index = parts.len();
        let parsed = parse_part(&xml, index)?;
        blocks.extend(parsed.blocks);
        loaded.insert(name.clone(), index);
        parts.push(XmlPart {
            name,
            xml,
            slots: parsed.slots,
        });
    }

    Ok(blocks)
}

fn for_each_run<F>(doc: &Document, f: &mut F)
where
    F: FnMut(&TextRun),
{
    walk_runs(&doc.body, f);
    for section in &doc.sections {
        walk_runs(&section.header.blocks, f);
        walk_runs(&section.footer.blocks, f);
    }
}

fn walk_runs<F>(blocks: &[Block], f: &mut F)
where
    F: FnMut(&TextRun),
{
    for block in blocks {
        match block {
            Block::Paragraph(p) => p.runs.iter().for_each(&mut *f),
            Block::Table(t) => {
                for cell in t.rows.iter().flat_map(|row| &row.cells) {
                    walk_runs(&cell.blocks, f);
                }
            }
        }
    }
}
