//! # docfill
//!
//! Fill `{{placeholder}}` templates in Word documents while preserving run
//! formatting.
//!
//! Word splits the visible text of a paragraph into runs whenever formatting,
//! spell-check state or editing history changes, so a token like
//! `{{client_name}}` is often spread over several runs. This library finds
//! placeholders in the concatenated paragraph text, maps them back to the
//! owning runs and splices the value into the first of them, leaving every
//! run's formatting and the run count untouched.
//!
//! ## Quick Start
//!
//! ```no_run
//! use docfill::{extract_placeholders, fill_file, PlaceholderValues};
//!
//! fn main() -> docfill::Result<()> {
//!     let names = extract_placeholders("templates/acme/offer.docx")?;
//!     println!("needs: {:?}", names);
//!
//!     let values = PlaceholderValues::new()
//!         .with("client_name", "ACME Corp")
//!         .with("amount", "1,200");
//!     let report = fill_file("templates/acme/offer.docx", "offer_acme.docx", &values)?;
//!     println!("replaced {}", report.total_replacements());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Split-run aware**: tokens spanning any number of runs are replaced
//! - **Formatting preserved**: only run text changes, never run properties
//! - **Whole document**: body, table cells, section headers and footers
//! - **Byte-preserving**: untouched package parts and XML are copied verbatim
//! - **Strict mode**: optionally refuse to generate when values are missing

pub mod detect;
pub mod docx;
pub mod error;
pub mod library;
pub mod model;
pub mod output;
pub mod template;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use docx::{DocxPackage, DocxTemplate};
pub use error::{Error, Result};
pub use library::{TemplateGroup, TemplateLibrary};
pub use model::{
    Block, Document, HeaderFooter, Paragraph, RunFormat, Section, Table, TableCell, TableRow,
    TextRun,
};
pub use output::{generate_file_name, unique_file_name};
pub use template::{ErrorMode, FillOptions, FillReport, PlaceholderValues, RunSequence, RunText};

use std::path::Path;

/// List the placeholder names used in a DOCX file.
///
/// Names are sorted and deduplicated; body, table cells, headers and footers
/// are all searched.
///
/// # Example
///
/// ```no_run
/// use docfill::extract_placeholders;
///
/// for name in extract_placeholders("offer.docx").unwrap() {
///     println!("{}", name);
/// }
/// ```
pub fn extract_placeholders<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let template = DocxTemplate::open(path)?;
    Ok(template.placeholders())
}

/// Fill a DOCX file and write the result to `target`.
///
/// `target` is only written when loading and filling succeeded.
///
/// # Example
///
/// ```no_run
/// use docfill::{fill_file, PlaceholderValues};
///
/// let values = PlaceholderValues::new().with("client", "ACME");
/// fill_file("offer.docx", "generated/offer_acme.docx", &values).unwrap();
/// ```
pub fn fill_file<S, T>(source: S, target: T, values: &PlaceholderValues) -> Result<FillReport>
where
    S: AsRef<Path>,
    T: AsRef<Path>,
{
    fill_file_with_options(source, target, values, &FillOptions::default())
}

/// Fill a DOCX file with custom options.
///
/// # Example
///
/// ```no_run
/// use docfill::{fill_file_with_options, FillOptions, PlaceholderValues};
///
/// let values = PlaceholderValues::new().with("client", "ACME");
/// let options = FillOptions::new().strict();
/// fill_file_with_options("offer.docx", "offer_acme.docx", &values, &options).unwrap();
/// ```
pub fn fill_file_with_options<S, T>(
    source: S,
    target: T,
    values: &PlaceholderValues,
    options: &FillOptions,
) -> Result<FillReport>
where
    S: AsRef<Path>,
    T: AsRef<Path>,
{
    let mut template = DocxTemplate::open(source)?;
    let report = template.fill(values, options)?;
    template.save(target)?;
    Ok(report)
}

/// Fill in-memory DOCX bytes and return the generated package.
pub fn fill_bytes(
    data: &[u8],
    values: &PlaceholderValues,
    options: &FillOptions,
) -> Result<(Vec<u8>, FillReport)> {
    let mut template = DocxTemplate::from_bytes(data)?;
    let report = template.fill(values, options)?;
    Ok((template.to_bytes()?, report))
}
