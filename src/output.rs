//! Collision-free names for generated documents.

use chrono::{DateTime, Local, TimeZone};
use std::path::Path;
use uuid::Uuid;

/// Timestamp format embedded in generated names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Hex characters of the id embedded in generated names.
const ID_LEN: usize = 8;

/// Build `{stem}_{timestamp}_{id}{.ext}` from a template file name.
///
/// Only the file name component of `file_name` is used.
pub fn unique_file_name<Tz>(file_name: &str, timestamp: &DateTime<Tz>, id: &Uuid) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let simple = id.simple().to_string();
    format!(
        "{}_{}_{}{}",
        stem,
        timestamp.format(TIMESTAMP_FORMAT),
        &simple[..ID_LEN],
        extension
    )
}

/// Generate a unique output name using the local clock and a random id.
pub fn generate_file_name(file_name: &str) -> String {
    unique_file_name(file_name, &Local::now(), &Uuid::new_v4())
}
