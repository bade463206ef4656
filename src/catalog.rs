//! Catalog of copyable configuration bundles.
//!
//! The catalog is a YAML document mapping a label to an ordered list of files:
//!
//! ```yaml
//! web:
//!   - path: nginx.conf
//! db:
//!   - path: pg.conf
//!     post_message: set POSTGRES_PASSWORD
//! ```
//!
//! Paths are relative to the base source directory and must stay inside it.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("label '{label}' has an invalid path '{path}': {reason}")]
    InvalidEntry {
        label: String,
        path: String,
        reason: &'static str,
    },
}

/// One file of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    /// Source path, relative to the base source directory.
    pub path: PathBuf,
    /// Shown after a successful copy.
    #[serde(default)]
    pub post_message: Option<String>,
}

/// Label -> ordered bundle entries. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    bundles: BTreeMap<String, Vec<CatalogEntry>>,
}

impl Catalog {
    /// Read and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&text, path)?;
        debug!(path = %path.display(), labels = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse catalog text. An empty document is an empty catalog.
    pub fn from_yaml(text: &str) -> Result<Self, CatalogError> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, origin: &Path) -> Result<Self, CatalogError> {
        let parsed: Option<BTreeMap<String, Option<Vec<CatalogEntry>>>> =
            serde_yaml::from_str(text).map_err(|source| CatalogError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;

        let bundles: BTreeMap<String, Vec<CatalogEntry>> = parsed
            .unwrap_or_default()
            .into_iter()
            .map(|(label, entries)| (label, entries.unwrap_or_default()))
            .collect();

        for (label, entries) in &bundles {
            for entry in entries {
                check_relative(&entry.path).map_err(|reason| CatalogError::InvalidEntry {
                    label: label.clone(),
                    path: entry.path.display().to_string(),
                    reason,
                })?;
            }
        }
        Ok(Self { bundles })
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> Vec<String> {
        self.bundles.keys().cloned().collect()
    }

    pub fn entries(&self, label: &str) -> Option<&[CatalogEntry]> {
        self.bundles.get(label).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Flatten `selection` into the list of files to copy.
    ///
    /// Selection order first, catalog order within a label. A label listed
    /// twice is resolved once; unknown labels contribute nothing and are
    /// only logged. Entries are not deduplicated across labels.
    pub fn resolve<S: AsRef<str>>(&self, selection: &[S]) -> Vec<CatalogEntry> {
        let mut seen: Vec<&str> = Vec::new();
        let mut files = Vec::new();
        for label in selection.iter().map(AsRef::as_ref) {
            if seen.contains(&label) {
                continue;
            }
            seen.push(label);
            match self.bundles.get(label) {
                Some(entries) => files.extend(entries.iter().cloned()),
                None => warn!(label, "Selected label not found in catalog; skipping"),
            }
        }
        files
    }
}

/// Entry paths must be non-empty, relative and free of `..`.
fn check_relative(path: &Path) -> Result<(), &'static str> {
    if path.as_os_str().is_empty() {
        return Err("path is empty");
    }
    for comp in path.components() {
        match comp {
            Component::Prefix(_) | Component::RootDir => return Err("path must be relative"),
            Component::ParentDir => return Err("path must not contain '..'"),
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(())
}
