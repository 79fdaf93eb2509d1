//! One end-to-end pipeline run.
//!
//! ```text
//! downloads/*.zip ──extract──▶ extracted/<album>/ ──normalize──▶ processed/<album>/*.avif
//!                                                                      │
//!                                              catalog (index.json) ◀──merge
//! ```
//!
//! Stages run sequentially, in directory-listing order. Every unit of work is
//! skipped when its result already exists, so re-running after an
//! interruption picks up where the last run stopped. Item failures (an
//! archive, an image, an album) are logged and counted; the run only fails
//! when the working directories cannot be prepared or the catalog cannot be
//! written.

use crate::archive::{ArchiveBackend, ZipBackend};
use crate::catalog::{AuditReport, Catalog, CatalogError, MergeStats};
use crate::config::PipelineConfig;
use crate::extract::{self, ExtractOptions, ExtractReport};
use crate::fsutil::{self, EntryKind};
use crate::imaging::{ImageBackend, RustBackend};
use crate::normalize::{self, NormalizeOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot list albums in {}: {source}", .path.display())]
    ListAlbums {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Invocation flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Re-extract archives whose album directory exists.
    pub force_extract: bool,
    /// Re-transcode images whose output exists.
    pub force_reprocess: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Outcome {
    #[default]
    Completed,
    /// The extraction root held no albums; the catalog was left untouched.
    NoAlbums,
}

/// Everything a run did, for the final report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub extraction: ExtractReport,
    pub albums_found: usize,
    pub albums_failed: usize,
    pub images_processed: usize,
    pub images_skipped: usize,
    pub images_failed: usize,
    /// Albums with at least one output this run, reused outputs included.
    pub discovered_albums: usize,
    /// Output paths reported this run, reused outputs included.
    pub discovered_paths: usize,
    /// Net additions to the catalog.
    pub merge: MergeStats,
    pub total_albums: usize,
    pub total_paths: usize,
}

/// Run the pipeline with the production backends.
pub fn run(config: &PipelineConfig, options: RunOptions) -> Result<RunSummary, PipelineError> {
    run_with_backends(&ZipBackend::new(), &RustBackend::new(), config, options)
}

/// Run the pipeline with the given archive and image backends.
pub fn run_with_backends(
    archives: &impl ArchiveBackend,
    images: &impl ImageBackend,
    config: &PipelineConfig,
    options: RunOptions,
) -> Result<RunSummary, PipelineError> {
    let paths = &config.paths;
    for dir in [&paths.extracted, &paths.processed] {
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }
    if options.force_extract {
        info!("Force extract: re-extracting every archive");
    }
    if options.force_reprocess {
        info!("Force reprocess: re-transcoding every image");
    }

    let mut catalog = Catalog::load_or_empty(&paths.catalog);
    let extraction = extract::extract_all(
        archives,
        &paths.downloads,
        &paths.extracted,
        &ExtractOptions::from_config(config, options.force_extract),
    );
    let mut summary = RunSummary {
        extraction,
        ..Default::default()
    };

    let album_dirs = list_albums(&paths.extracted)?;
    if album_dirs.is_empty() {
        info!(extracted = %paths.extracted.display(), "No albums to process");
        summary.outcome = Outcome::NoAlbums;
        summary.total_albums = catalog.total_albums();
        summary.total_paths = catalog.total_paths();
        return Ok(summary);
    }
    summary.albums_found = album_dirs.len();
    info!(count = album_dirs.len(), "Processing albums");

    let normalize_options = NormalizeOptions::from_config(config, options.force_reprocess);
    let mut discovered: Vec<(String, Vec<String>)> = Vec::new();
    for dir in &album_dirs {
        let Some(album) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        match normalize::normalize_album(images, dir, &album, &normalize_options) {
            Ok(report) => {
                summary.images_processed += report.processed;
                summary.images_skipped += report.skipped;
                summary.images_failed += report.failed;
                if !report.outputs.is_empty() {
                    discovered.push((album, report.outputs));
                }
            }
            Err(e) => {
                error!(album = %album, error = %e, "Failed to process album");
                summary.albums_failed += 1;
            }
        }
    }

    summary.discovered_albums = discovered.len();
    summary.discovered_paths = discovered.iter().map(|(_, paths)| paths.len()).sum();
    summary.merge = catalog.merge(discovered);
    catalog.save(&paths.catalog)?;
    info!(catalog = %paths.catalog.display(), "Catalog written");

    summary.total_albums = catalog.total_albums();
    summary.total_paths = catalog.total_paths();
    Ok(summary)
}

fn list_albums(extracted: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    fsutil::list_entries(extracted, EntryKind::Dirs).map_err(|source| PipelineError::ListAlbums {
        path: extracted.to_path_buf(),
        source,
    })
}

/// State of the catalog as seen by `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub catalog: PathBuf,
    /// Whether the catalog file exists at all.
    pub exists: bool,
    pub total_albums: usize,
    pub total_paths: usize,
    pub audit: AuditReport,
}

/// Load the catalog strictly and audit it against the filesystem.
///
/// Unlike a run, a malformed catalog is an error here.
pub fn check(config: &PipelineConfig) -> Result<CheckReport, PipelineError> {
    let path = &config.paths.catalog;
    let loaded = Catalog::read(path)?;
    let exists = loaded.is_some();
    let catalog = loaded.unwrap_or_default();
    Ok(CheckReport {
        catalog: path.clone(),
        exists,
        total_albums: catalog.total_albums(),
        total_paths: catalog.total_paths(),
        audit: catalog.audit(),
    })
}
