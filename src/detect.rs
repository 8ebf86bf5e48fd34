//! DOCX format detection and validation.

use crate::docx::{DocxPackage, DOCUMENT_PART};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// DOCX package information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Number of entries in the archive
    pub part_count: usize,
    /// Whether the package carries a VBA project (`.docm`)
    pub macro_enabled: bool,
    /// Whether any header part is present
    pub has_headers: bool,
    /// Whether any footer part is present
    pub has_footers: bool,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.macro_enabled { "DOCM" } else { "DOCX" };
        write!(f, "{} ({} parts)", kind, self.part_count)
    }
}

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Whether the data starts like a zip archive.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Detect DOCX format from a file path.
///
/// # Example
/// ```no_run
/// use docfill::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("template.docx").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect_format_from_bytes(&data)
}

/// Detect DOCX format from the complete bytes of a file.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a zip archive with a main document part
/// * `Err(Error::UnknownFormat)` if the data is not a zip archive
/// * `Err(Error::MissingPart)` if the archive has no `word/document.xml`
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !is_zip_bytes(data) {
        return Err(Error::UnknownFormat);
    }

    let package = DocxPackage::from_bytes(data)?;
    if !package.contains(DOCUMENT_PART) {
        return Err(Error::MissingPart(DOCUMENT_PART.to_string()));
    }

    let is_part = |prefix: &str| {
        package
            .names()
            .any(|name| name.starts_with(prefix) && name.ends_with(".xml"))
    };

    let macro_enabled = package.names().any(|name| name.ends_with("vbaProject.bin"));
    let has_headers = is_part("word/header");
    let has_footers = is_part("word/footer");

    Ok(DocxFormat {
        part_count: package.len(),
        macro_enabled,
        has_headers,
        has_footers,
    })
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes are a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Whether a file name has a `.docx` extension, in any case.
pub fn has_docx_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}
