//! The persisted catalog: album name → ordered list of normalized outputs.
//!
//! Stored as one pretty-printed JSON object:
//!
//! ```json
//! {
//!   "Trip2020": [
//!     "timeliner_repo/processed/downloaded/Trip2020/a.avif",
//!     "timeliner_repo/processed/downloaded/Trip2020/b.avif"
//!   ]
//! }
//! ```
//!
//! The whole document is read into memory, merged, and written back in full
//! through an atomic temp-file swap. Keys serialize in sorted order.
//!
//! Merging never removes anything. Within an album a path is appended only if
//! the album's list does not hold it yet; duplicates that were already in the
//! file (from hand edits) are left alone and reported by [`Catalog::audit`].

use crate::fsutil;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    albums: BTreeMap<String, Vec<String>>,
}

/// What a merge added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Albums that had no entry before the merge.
    pub added_albums: usize,
    /// Paths appended across all albums.
    pub added_paths: usize,
}

/// One questionable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    pub album: String,
    pub path: String,
}

/// Findings of [`Catalog::audit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Paths that do not exist on disk.
    pub missing: Vec<CatalogIssue>,
    /// Repeated paths within one album (each repeat listed once).
    pub duplicates: Vec<CatalogIssue>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the catalog at `path`. `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>, CatalogError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Read the catalog, degrading to an empty one.
    ///
    /// A missing file is the normal first-run case. An unreadable or
    /// malformed file is logged as a warning and also yields an empty
    /// catalog; the next save replaces it.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::read(path) {
            Ok(Some(catalog)) => {
                info!(
                    catalog = %path.display(),
                    albums = catalog.total_albums(),
                    "Loaded existing catalog"
                );
                catalog
            }
            Ok(None) => {
                info!(catalog = %path.display(), "No catalog yet, starting empty");
                Self::new()
            }
            Err(e) => {
                warn!(
                    catalog = %path.display(),
                    error = %e,
                    "Could not parse existing catalog, starting fresh"
                );
                Self::new()
            }
        }
    }

    /// Write the whole catalog as pretty JSON, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self)?;
        fsutil::write_atomic(path, json.as_bytes())?;
        Ok(())
    }

    /// Merge newly discovered album results into the catalog.
    ///
    /// Every discovered album gets an entry. Each path is appended to its
    /// album's list unless already present there; existing entries keep
    /// their order and new ones follow in discovery order.
    pub fn merge<I>(&mut self, discovered: I) -> MergeStats
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut stats = MergeStats::default();
        for (album, paths) in discovered {
            if !self.albums.contains_key(&album) {
                stats.added_albums += 1;
            }
            let list = self.albums.entry(album).or_default();
            let mut present: HashSet<String> = list.iter().cloned().collect();
            for path in paths {
                if present.insert(path.clone()) {
                    list.push(path);
                    stats.added_paths += 1;
                }
            }
        }
        stats
    }

    /// Paths recorded for `album`.
    pub fn get(&self, album: &str) -> Option<&[String]> {
        self.albums.get(album).map(Vec::as_slice)
    }

    /// Albums with their paths, in key order.
    pub fn albums(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.albums
            .iter()
            .map(|(album, paths)| (album.as_str(), paths.as_slice()))
    }

    pub fn total_albums(&self) -> usize {
        self.albums.len()
    }

    pub fn total_paths(&self) -> usize {
        self.albums.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Check every entry against the filesystem and for in-album repeats.
    ///
    /// Relative paths resolve against the current directory, the same base
    /// the pipeline wrote them from.
    pub fn audit(&self) -> AuditReport {
        let mut report = AuditReport::default();
        for (album, paths) in &self.albums {
            let mut seen = HashSet::new();
            for path in paths {
                let issue = || CatalogIssue {
                    album: album.clone(),
                    path: path.clone(),
                };
                if !seen.insert(path.as_str()) {
                    report.duplicates.push(issue());
                } else if !Path::new(path).exists() {
                    report.missing.push(issue());
                }
            }
        }
        report
    }
}

impl FromIterator<(String, Vec<String>)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self {
            albums: iter.into_iter().collect(),
        }
    }
}
