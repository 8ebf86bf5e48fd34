//! Zip container access for DOCX packages.

use super::xml::{attr, tags, TagKind};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// Main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Relationships of the main document part.
pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

/// One relationship of a package part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship type URI
    pub rel_type: String,
    /// Target as written in the rels file
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// An opened package: every entry, in archive order.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    /// Read all entries from a zip archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            entries.push((name, data));
        }
        log::debug!("Opened package with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Read all entries from in-memory bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Raw bytes of an entry.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, data)| data.as_slice())
    }

    /// An entry decoded as UTF-8, with any byte order mark removed.
    pub fn text(&self, name: &str) -> Result<Option<String>> {
        let Some(data) = self.get(name) else {
            return Ok(None);
        };
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let text = String::from_utf8(data.to_vec())
            .map_err(|e| Error::Encoding(format!("{}: {}", name, e)))?;
        Ok(Some(text))
    }

    /// Replace an entry's bytes, or append a new entry.
    pub fn set(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, existing)) => *existing = data,
            None => self.entries.push((name.to_string(), data)),
        }
    }

    /// Relationships declared in a rels part, keyed by id.
    ///
    /// A missing rels part yields an empty map.
    pub fn relationships(&self, rels_part: &str) -> Result<HashMap<String, Relationship>> {
        let Some(xml) = self.text(rels_part)? else {
            return Ok(HashMap::new());
        };
        Ok(parse_relationships(&xml))
    }

    /// Serialize the package, substituting some entries.
    ///
    /// Media is stored, everything else deflated.
    pub fn to_bytes_with(&self, overrides: &HashMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, data) in &self.entries {
            if name.ends_with('/') {
                zip.add_directory(name.as_str(), deflated)?;
                continue;
            }
            let opts = if name.starts_with("word/media/") {
                stored
            } else {
                deflated
            };
            let data = overrides.get(name).unwrap_or(data);
            zip.start_file(name.as_str(), opts)?;
            zip.write_all(data)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Serialize the package unchanged.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_bytes_with(&HashMap::new())
    }
}

/// Parse the `<Relationship>` elements of a rels part.
pub fn parse_relationships(xml: &str) -> HashMap<String, Relationship> {
    let mut map = HashMap::new();
    for tag in tags(xml) {
        if tag.name != "Relationship" || tag.kind == TagKind::Close {
            continue;
        }
        let (Some(id), Some(target)) = (attr(tag.attrs, "Id"), attr(tag.attrs, "Target")) else {
            continue;
        };
        let relationship = Relationship {
            rel_type: attr(tag.attrs, "Type").unwrap_or_default(),
            target,
            external: attr(tag.attrs, "TargetMode").as_deref() == Some("External"),
        };
        map.insert(id, relationship);
    }
    map
}

/// Resolve a relationship target against the directory of its source part.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
