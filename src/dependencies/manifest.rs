//! Dependency manifest parsing.
//!
//! The manifest is a pip requirements file. Only the package name of each
//! line matters to reconciliation; the constraint is kept verbatim and handed
//! back to pip untouched.

use std::fs;
use std::path::Path;

use crate::error::{LaunchkitError, Result};

/// Characters that end the package name on a manifest line.
pub const CONSTRAINT_DELIMITERS: [char; 5] = ['=', '<', '>', '!', '~'];

/// One declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Package name with all whitespace removed. Case is preserved.
    pub name: String,
    /// Everything from the first delimiter on, trimmed. Empty if unpinned.
    pub raw_constraint: String,
}

impl DependencySpec {
    /// Parse a single manifest line. Returns `None` for lines that declare
    /// nothing: blanks, comments and pip options such as `-r other.txt`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            return None;
        }

        // Inline comments and environment markers are not part of the
        // requirement itself.
        let requirement = strip_after(strip_after(line, " #"), ";");

        let (head, constraint) = match requirement.find(CONSTRAINT_DELIMITERS) {
            Some(idx) => requirement.split_at(idx),
            None => (requirement, ""),
        };

        // Extras (`pkg[extra]`) select optional features of the same package.
        let head = head.split('[').next().unwrap_or(head);
        let name: String = head.chars().filter(|c| !c.is_whitespace()).collect();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            raw_constraint: constraint.trim().to_string(),
        })
    }
}

fn strip_after<'a>(text: &'a str, marker: &str) -> &'a str {
    match text.find(marker) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Parse manifest content into specs, in file order.
pub fn parse_manifest(content: &str) -> Vec<DependencySpec> {
    content
        .lines()
        .filter_map(DependencySpec::parse_line)
        .collect()
}

/// Read and parse a manifest file.
///
/// # Errors
///
/// Returns `ManifestNotFound` when the file does not exist.
pub fn load_manifest(path: &Path) -> Result<Vec<DependencySpec>> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LaunchkitError::ManifestNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LaunchkitError::Io(e)
        }
    })?;
    Ok(parse_manifest(&content))
}
