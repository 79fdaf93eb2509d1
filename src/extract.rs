//! Archive materialization.
//!
//! Turns every archive in the downloads directory into one flat directory of
//! raw images under the extraction root. The album directory's existence is
//! the "already extracted" marker, so an album is staged in a hidden
//! `.partial-<album>` directory and renamed into place only once every entry
//! has been written. An interrupted run leaves at most a stale staging
//! directory, which the next attempt discards.
//!
//! ## Flattening
//!
//! Only the last segment of an entry path is kept:
//!
//! ```text
//! Trip/a.jpg          → Trip/a.jpg
//! Trip/day2/b.png     → Trip/b.png
//! Trip/notes.txt      → (ignored, not an image)
//! ```
//!
//! Two entries with the same base name collide. The later one wins and a
//! warning is logged, unless `disambiguate_collisions` is set, in which case
//! the later one gets a short hash of its entry path appended to its stem.

use crate::archive::{ArchiveBackend, ArchiveError, ArchiveReader, EntryInfo};
use crate::config::PipelineConfig;
use crate::fsutil::{self, EntryKind, STAGING_PREFIX};
use crate::naming;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid album name {0:?}")]
    InvalidAlbumName(String),
}

/// Settings for one extraction pass.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Re-extract even when the album directory already exists.
    pub force: bool,
    /// Extensions of files in the downloads directory treated as archives.
    pub archive_extensions: Vec<String>,
    /// Extensions of entries worth extracting.
    pub image_extensions: Vec<String>,
    /// Rename colliding entries instead of overwriting.
    pub disambiguate_collisions: bool,
}

impl ExtractOptions {
    pub fn from_config(config: &PipelineConfig, force: bool) -> Self {
        Self {
            force,
            archive_extensions: config.archives.extensions.clone(),
            image_extensions: config.images.extensions.clone(),
            disambiguate_collisions: config.archives.disambiguate_collisions,
        }
    }
}

/// What happened to a single archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The album directory already existed.
    Skipped { album: String },
    /// Entries were written. With zero images no directory is created.
    Extracted { album: String, images: usize },
}

/// Counts for one pass over the downloads directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub archives_found: usize,
    pub archives_extracted: usize,
    pub archives_skipped: usize,
    pub archives_failed: usize,
    /// Image entries written, collisions included.
    pub images_extracted: usize,
}

/// Extract every archive in `downloads` into `extracted_root`.
///
/// A missing downloads directory means there is nothing to do. Archives are
/// handled in name order; one that fails is logged and counted, and the rest
/// still run.
pub fn extract_all(
    backend: &impl ArchiveBackend,
    downloads: &Path,
    extracted_root: &Path,
    options: &ExtractOptions,
) -> ExtractReport {
    let mut report = ExtractReport::default();
    if !downloads.is_dir() {
        info!(downloads = %downloads.display(), "No downloads directory, skipping extraction");
        return report;
    }

    let archives: Vec<PathBuf> = match fsutil::list_entries(downloads, EntryKind::Files) {
        Ok(files) => files
            .into_iter()
            .filter(|path| {
                path.file_name().is_some_and(|name| {
                    naming::has_extension(&name.to_string_lossy(), &options.archive_extensions)
                })
            })
            .collect(),
        Err(e) => {
            warn!(downloads = %downloads.display(), error = %e, "Cannot list downloads directory");
            return report;
        }
    };
    report.archives_found = archives.len();
    if !archives.is_empty() {
        info!(count = archives.len(), "Found archives");
    }

    for archive in &archives {
        match extract_archive(backend, archive, extracted_root, options) {
            Ok(ExtractOutcome::Skipped { .. }) => report.archives_skipped += 1,
            Ok(ExtractOutcome::Extracted { images, .. }) => {
                report.archives_extracted += 1;
                report.images_extracted += images;
            }
            Err(e) => {
                warn!(archive = %archive.display(), error = %e, "Failed to extract archive");
                report.archives_failed += 1;
            }
        }
    }
    report
}

/// Materialize one archive as `extracted_root/<album>/`.
pub fn extract_archive(
    backend: &impl ArchiveBackend,
    archive_path: &Path,
    extracted_root: &Path,
    options: &ExtractOptions,
) -> Result<ExtractOutcome, ExtractError> {
    let mut reader = backend.open(archive_path)?;
    let entries = reader.entries().to_vec();
    let album =
        naming::derive_album_name(entries.iter().map(|e| e.name.as_str()), archive_path);
    if album.is_empty()
        || album == "."
        || album == ".."
        || album.contains(['/', '\\'])
        || fsutil::is_in_flight(&album)
    {
        return Err(ExtractError::InvalidAlbumName(album));
    }

    let target = extracted_root.join(&album);
    if target.exists() && !options.force {
        info!(album = %album, archive = %archive_path.display(), "Already extracted, skipping");
        return Ok(ExtractOutcome::Skipped { album });
    }

    let staging = extracted_root.join(format!("{STAGING_PREFIX}{album}"));
    if staging.exists() {
        debug!(staging = %staging.display(), "Removing stale staging directory");
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let images = match stage_entries(&mut *reader, &entries, &staging, &album, options) {
        Ok(images) => images,
        Err(e) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    if images == 0 {
        fs::remove_dir_all(&staging)?;
        info!(album = %album, archive = %archive_path.display(), "Archive holds no images");
        return Ok(ExtractOutcome::Extracted { album, images });
    }

    commit_staging(&staging, &target)?;
    info!(album = %album, images, "Extracted archive");
    Ok(ExtractOutcome::Extracted { album, images })
}

/// Write every image entry into `staging`. Returns the number written.
fn stage_entries(
    reader: &mut dyn ArchiveReader,
    entries: &[EntryInfo],
    staging: &Path,
    album: &str,
    options: &ExtractOptions,
) -> Result<usize, ExtractError> {
    // file name in staging -> entry path that produced it
    let mut written: HashMap<String, String> = HashMap::new();
    let mut images = 0;

    for entry in entries {
        if entry.is_dir {
            continue;
        }
        let Some(base) = naming::entry_file_name(&entry.name) else {
            continue;
        };
        if !naming::has_extension(base, &options.image_extensions) {
            continue;
        }

        let mut file_name = base.to_string();
        if let Some(previous) = written.get(&file_name) {
            if options.disambiguate_collisions {
                file_name = naming::disambiguated_name(base, &entry.name);
                warn!(
                    album = %album,
                    entry = %entry.name,
                    first = %previous,
                    renamed = %file_name,
                    "File name collision, keeping both"
                );
            } else {
                warn!(
                    album = %album,
                    entry = %entry.name,
                    first = %previous,
                    "File name collision, later entry overwrites earlier one"
                );
            }
        }

        let bytes = reader.read(entry.index)?;
        fs::write(staging.join(&file_name), bytes)?;
        written.insert(file_name, entry.name.clone());
        images += 1;
    }
    Ok(images)
}

/// Move a completed staging directory to its final place.
///
/// A fresh album is a single directory rename. A forced re-extraction into an
/// existing album moves files one by one, replacing same-named files and
/// keeping the rest.
fn commit_staging(staging: &Path, target: &Path) -> Result<(), ExtractError> {
    if !target.exists() {
        fs::rename(staging, target)?;
        return Ok(());
    }
    for file in fsutil::list_entries(staging, EntryKind::Files)? {
        if let Some(name) = file.file_name() {
            fs::rename(&file, target.join(name))?;
        }
    }
    fs::remove_dir_all(staging)?;
    Ok(())
}
