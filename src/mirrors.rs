//! # Mirror File Format
//!
//! This module defines the on-disk representation of the mirror list and the
//! functions that read and write it. The file is YAML with a single top-level
//! `repos` key holding the rules in insertion order:
//!
//! ```yaml
//! repos:
//!   - prefix: golang.org/x/sys
//!     repo: https://github.com/golang/sys.git
//!     vcs: git
//! ```
//!
//! An empty file (or one that only holds comments) is an empty document. A
//! missing `vcs` key is read as the empty string, meaning "unspecified".
//!
//! Writes replace the whole file by writing a sibling temporary file and
//! renaming it over the destination. A symlinked mirror file is written at
//! its target and keeps its permissions.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// A single redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorEntry {
    /// Package path the rule applies to.
    pub prefix: String,
    /// Replacement repository URL.
    pub repo: String,
    /// VCS kind, empty when unspecified.
    #[serde(default)]
    pub vcs: String,
}

impl MirrorEntry {
    /// Create an entry from its three fields.
    pub fn new(
        prefix: impl Into<String>,
        repo: impl Into<String>,
        vcs: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            repo: repo.into(),
            vcs: vcs.into(),
        }
    }
}

impl std::fmt::Display for MirrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.prefix, self.repo)?;
        if !self.vcs.is_empty() {
            write!(f, " ({})", self.vcs)?;
        }
        Ok(())
    }
}

/// The full persisted mirror list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repos: Vec<MirrorEntry>,
}

impl MirrorDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the document holds no entries.
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Number of entries in the document.
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    /// Find the entry with exactly this prefix.
    pub fn find(&self, prefix: &str) -> Option<&MirrorEntry> {
        self.repos.iter().find(|entry| entry.prefix == prefix)
    }
}

// `repos:` with no value is a null in YAML.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<MirrorEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<MirrorEntry>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Parses the contents of a mirror file.
pub fn parse(yaml_content: &str) -> std::result::Result<MirrorDocument, serde_yaml::Error> {
    if is_blank_document(yaml_content) {
        return Ok(MirrorDocument::new());
    }
    serde_yaml::from_str(yaml_content)
}

fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

/// Reads and parses the mirror file at `path`.
///
/// The file must exist; use [`load_document`] when absence is acceptable.
pub fn read_document(path: &Path) -> Result<MirrorDocument> {
    let content = fs::read_to_string(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let document = parse(&content).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::debug!("Read {} mirror(s) from {}", document.len(), path.display());
    Ok(document)
}

/// Reads the mirror file if it exists, returning `None` when it does not.
pub fn load_document(path: &Path) -> Result<Option<MirrorDocument>> {
    if !path.try_exists()? {
        log::debug!("No mirror file at {}", path.display());
        return Ok(None);
    }
    read_document(path).map(Some)
}

/// Serializes `document` and replaces the contents of the file at `path`.
///
/// When `path` already exists it is resolved first, so a symlinked mirror
/// file is updated at its target, and the existing permissions are kept.
/// The parent directory is created when missing.
pub fn write_document(path: &Path, document: &MirrorDocument) -> Result<()> {
    let write_error = |message: String| Error::Write {
        path: path.to_path_buf(),
        message,
    };

    let content = serde_yaml::to_string(document).map_err(|e| write_error(e.to_string()))?;

    let existing = fs::metadata(path).ok();
    let target = match existing {
        Some(_) => fs::canonicalize(path).map_err(|e| write_error(e.to_string()))?,
        None => path.to_path_buf(),
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }

    let tmp_path = temp_path_for(&target);
    let permissions = existing.map(|metadata| metadata.permissions());
    if let Err(e) = write_temp(&tmp_path, &content, permissions) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_error(e.to_string()));
    }
    if let Err(e) = fs::rename(&tmp_path, &target) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_error(e.to_string()));
    }

    log::debug!("Wrote {} mirror(s) to {}", document.len(), target.display());
    Ok(())
}

// Permissions are applied before any content lands in the file.
fn write_temp(
    tmp_path: &Path,
    content: &str,
    permissions: Option<fs::Permissions>,
) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
