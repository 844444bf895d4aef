//! The project image catalog.
//!
//! A hand-maintained, ordered list of relative image paths. The catalog
//! feeds the hero slideshow (via random assignment) and the `check`
//! subcommand, which verifies the listed files against an assets directory.

use std::collections::BTreeSet;
use std::path::Path;

use rand::Rng;
use thiserror::Error;

/// Extensions the catalog accepts.
const SUPPORTED_EXTENSIONS: &[&str] = &["webp", "jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("image catalog is empty")]
    Empty,
    #[error("catalog path must be a relative URL: {0}")]
    NotRelative(String),
    #[error("unsupported image extension: {0}")]
    UnsupportedExtension(String),
}

/// Ordered collection of candidate hero/gallery images.
#[derive(Debug, Clone)]
pub struct ImageCatalog {
    paths: Vec<String>,
}

impl ImageCatalog {
    /// Build a catalog from relative paths, validating each entry.
    pub fn new(paths: Vec<String>) -> Result<Self, CatalogError> {
        if paths.is_empty() {
            return Err(CatalogError::Empty);
        }
        for path in &paths {
            if path.starts_with('/') || path.contains("://") {
                return Err(CatalogError::NotRelative(path.clone()));
            }
            let ext = Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase());
            match ext {
                Some(e) if SUPPORTED_EXTENSIONS.contains(&e.as_str()) => {}
                _ => return Err(CatalogError::UnsupportedExtension(path.clone())),
            }
        }
        Ok(Self { paths })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Draw a random assignment of `slots` images.
    ///
    /// Runs a Fisher–Yates shuffle over a copy of the catalog (top index
    /// down, swapping with a uniform partner at or below), then takes the
    /// head of the permutation. The result has no repeats and every subset
    /// and order is equally likely. A catalog smaller than `slots` yields
    /// one entry per available image; the remaining slots stay unassigned.
    pub fn assign<R: Rng>(&self, slots: usize, rng: &mut R) -> Vec<String> {
        let mut pool = self.paths.clone();
        for i in (1..pool.len()).rev() {
            let j = rng.random_range(0..=i);
            pool.swap(i, j);
        }
        pool.truncate(slots.min(self.paths.len()));
        pool
    }
}

/// Outcome of checking one catalog entry against the assets directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "detail")]
pub enum EntryStatus {
    Ok,
    Missing,
    Undecodable(String),
}

/// Result of validating a catalog against an assets directory.
#[derive(Debug, serde::Serialize)]
pub struct CheckReport {
    /// One `(path, status)` per catalog entry, in catalog order.
    pub entries: Vec<(String, EntryStatus)>,
    /// Image files present under the assets root but absent from the catalog.
    pub unreferenced: Vec<String>,
}

impl CheckReport {
    pub fn all_ok(&self) -> bool {
        self.entries.iter().all(|(_, s)| *s == EntryStatus::Ok)
    }
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Verify that every catalog entry exists under `root` and decodes as an
/// image, and list image files under `root` the catalog does not reference.
pub fn check_assets(catalog: &ImageCatalog, root: &Path) -> Result<CheckReport, CheckError> {
    let mut entries = Vec::with_capacity(catalog.len());
    for path in catalog.paths() {
        let full = root.join(path);
        let status = if !full.is_file() {
            EntryStatus::Missing
        } else {
            match image::open(&full) {
                Ok(_) => EntryStatus::Ok,
                Err(e) => EntryStatus::Undecodable(e.to_string()),
            }
        };
        entries.push((path.clone(), status));
    }

    let referenced: BTreeSet<&str> = catalog.paths().iter().map(String::as_str).collect();
    let mut unreferenced = Vec::new();
    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let is_image = matches!(ext.as_deref(), Some(e) if SUPPORTED_EXTENSIONS.contains(&e));
        if !is_image {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        if !referenced.contains(rel.as_str()) {
            unreferenced.push(rel);
        }
    }

    Ok(CheckReport {
        entries,
        unreferenced,
    })
}
