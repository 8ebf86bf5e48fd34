//! Error types for docfill library.

use std::io;
use thiserror::Error;

/// Result type alias for docfill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, filling or saving templates.
///
/// Placeholder substitution itself never fails: unknown names, malformed
/// tokens and unresolvable spans are left untouched. These variants cover
/// the package boundary and value parsing.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as a DOCX package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// Error reading or writing the zip container.
    #[error("Archive error: {0}")]
    Zip(String),

    /// A required package part is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// A part's XML could not be tokenized into a consistent element tree.
    #[error("Malformed XML: {0}")]
    Xml(String),

    /// A part is not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Error decoding a JSON values file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Strict mode: the document contains placeholders without values.
    #[error("Missing values for placeholders: {}", .0.join(", "))]
    MissingValues(Vec<String>),

    /// A placeholder value could not be parsed.
    #[error("Invalid placeholder value: {0}")]
    InvalidValue(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::InvalidArchive(_) => Error::UnknownFormat,
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
