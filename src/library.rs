//! Template library listing.
//!
//! A library root holds one directory per group (a company, a department)
//! and each group directory holds `.docx` templates.

use crate::detect::has_docx_extension;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One group of templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroup {
    /// Directory name
    pub name: String,
    /// Template file names, sorted
    pub templates: Vec<String>,
}

impl TemplateGroup {
    /// Whether the group lists no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// All template groups under a root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Groups sorted by name
    pub groups: Vec<TemplateGroup>,
}

impl TemplateLibrary {
    /// Scan a library root.
    ///
    /// Files directly inside `root` are ignored, as are Word lock files
    /// (`~$name.docx`).
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let mut groups = Vec::new();

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let templates = list_templates(&entry.path())?;
            groups.push(TemplateGroup { name, templates });
        }

        groups.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!("Scanned {} template group(s) in {}", groups.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            groups,
        })
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&TemplateGroup> {
        self.groups.iter().find(|group| group.name == name)
    }

    /// Path of a template, if the library lists it.
    pub fn template_path(&self, group: &str, template: &str) -> Option<PathBuf> {
        self.group(group)?
            .templates
            .iter()
            .find(|t| *t == template)
            .map(|t| self.root.join(group).join(t))
    }

    /// Total number of templates across groups.
    pub fn template_count(&self) -> usize {
        self.groups.iter().map(|group| group.templates.len()).sum()
    }

    /// Whether no group lists any template.
    pub fn is_empty(&self) -> bool {
        self.template_count() == 0
    }
}

fn list_templates(dir: &Path) -> Result<Vec<String>> {
    let mut templates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("~$") || !has_docx_extension(&name) {
            continue;
        }
        templates.push(name);
    }
    templates.sort();
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: PathBuf) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_scan() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("beta")).unwrap();
        fs::create_dir(root.join("acme")).unwrap();
        fs::create_dir(root.join("acme").join("nested")).unwrap();
        touch(root.join("loose.docx"));
        touch(root.join("acme").join("offer.docx"));
        touch(root.join("acme").join("Invoice.DOCX"));
        touch(root.join("acme").join("~$offer.docx"));
        touch(root.join("acme").join("notes.txt"));

        let library = TemplateLibrary::scan(root).unwrap();
        let names: Vec<&str> = library.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["acme", "beta"]);
        assert_eq!(library.groups[0].templates, vec!["Invoice.DOCX", "offer.docx"]);
        assert!(library.groups[1].is_empty());
        assert_eq!(library.template_count(), 2);
        assert_eq!(
            library.template_path("acme", "offer.docx"),
            Some(root.join("acme").join("offer.docx"))
        );
        assert_eq!(library.template_path("acme", "missing.docx"), None);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        assert!(TemplateLibrary::scan(dir.path().join("nope")).is_err());
    }
}
