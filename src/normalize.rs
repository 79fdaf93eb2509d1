//! Album normalization: one resized, re-encoded output per source image.
//!
//! For an extracted album directory `extracted/<album>/`, every recognized
//! image produces `processed/<sanitized album>/<stem>.<ext>`, where `<ext>` is
//! the backend's output extension. An output that already exists is reused
//! as is unless reprocessing is forced. Outputs are written atomically, so an
//! existing output is always a complete one.
//!
//! ```text
//! extracted/Trip: Rome/IMG_1.JPG   →  processed/Trip_ Rome/IMG_1.avif
//! extracted/Trip: Rome/notes.txt   →  (ignored)
//! ```
//!
//! A single image that cannot be read or transcoded is logged and counted;
//! the rest of the album still runs. Only failing to list the album itself is
//! an album-level error.

use crate::config::PipelineConfig;
use crate::fsutil::{self, EntryKind};
use crate::imaging::{self, BackendError, ImageBackend, NormalizedImage, Quality, ResizeLimits};
use crate::naming;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Settings for normalizing albums.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Root under which each album gets its output directory.
    pub output_root: PathBuf,
    pub limits: ResizeLimits,
    pub quality: Quality,
    pub image_extensions: Vec<String>,
    /// Re-transcode images whose output already exists.
    pub force: bool,
}

impl NormalizeOptions {
    pub fn from_config(config: &PipelineConfig, force: bool) -> Self {
        Self {
            output_root: config.paths.processed.clone(),
            limits: ResizeLimits {
                max_width: config.images.max_width,
                max_height: config.images.max_height,
            },
            quality: Quality::new(config.images.quality),
            image_extensions: config.images.extensions.clone(),
            force,
        }
    }
}

/// Result of normalizing one album.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumReport {
    pub album: String,
    /// Output paths, reused and new, in source file order.
    pub outputs: Vec<String>,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Output directory for an album.
pub fn album_output_dir(output_root: &Path, album: &str) -> PathBuf {
    output_root.join(naming::sanitize_album_name(album))
}

/// String form of an output path, as recorded in the catalog.
pub fn catalog_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Normalize every recognized image in `album_dir`.
pub fn normalize_album(
    backend: &impl ImageBackend,
    album_dir: &Path,
    album: &str,
    options: &NormalizeOptions,
) -> Result<AlbumReport, NormalizeError> {
    let files = fsutil::list_entries(album_dir, EntryKind::Files)?;
    let out_dir = album_output_dir(&options.output_root, album);
    let mut report = AlbumReport {
        album: album.to_string(),
        ..Default::default()
    };

    for file in &files {
        let Some(name) = file.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if !naming::has_extension(&name, &options.image_extensions) {
            continue;
        }

        let out_path = out_dir.join(naming::output_file_name(&name, backend.output_extension()));
        if out_path.exists() && !options.force {
            debug!(album = %album, file = %name, "Output exists, skipping");
            report.outputs.push(catalog_path(&out_path));
            report.skipped += 1;
            continue;
        }

        match normalize_file(backend, file, &out_path, options) {
            Ok(image) => {
                debug!(
                    album = %album,
                    file = %name,
                    width = image.target.width,
                    height = image.target.height,
                    "Normalized image"
                );
                report.outputs.push(catalog_path(&out_path));
                report.processed += 1;
            }
            Err(e) => {
                warn!(album = %album, file = %file.display(), error = %e, "Failed to normalize image");
                report.failed += 1;
            }
        }
    }

    info!(
        album = %album,
        processed = report.processed,
        skipped = report.skipped,
        failed = report.failed,
        "Album normalized"
    );
    Ok(report)
}

/// Read, transcode, and atomically write one image.
fn normalize_file(
    backend: &impl ImageBackend,
    source: &Path,
    out_path: &Path,
    options: &NormalizeOptions,
) -> Result<NormalizedImage, NormalizeError> {
    let data = fs::read(source)?;
    let image = imaging::normalize_image(backend, &data, options.limits, options.quality)?;
    fsutil::write_atomic(out_path, &image.bytes)?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn options(root: &Path) -> NormalizeOptions {
        NormalizeOptions::from_config(&config_in(root), false)
    }

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn normalizes_recognized_images_in_name_order() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join("b.png"), &stub(2000, 3000));
        write_file(&album_dir.join("a.JPG"), &stub(3000, 2000));
        write_file(&album_dir.join("c.jpg"), &stub(800, 600));
        write_file(&album_dir.join("notes.txt"), b"not an image");

        let backend = MockBackend::new();
        let report = normalize_album(&backend, &album_dir, "Trip", &opts).unwrap();

        let out_dir = opts.output_root.join("Trip");
        assert_eq!(
            report.outputs,
            vec![
                catalog_path(&out_dir.join("a.avif")),
                catalog_path(&out_dir.join("b.avif")),
                catalog_path(&out_dir.join("c.avif")),
            ]
        );
        assert_eq!((report.processed, report.skipped, report.failed), (3, 0, 0));
        assert_eq!(
            backend.transcodes(),
            vec![
                (dims(3000, 2000), dims(1920, 1280)),
                (dims(2000, 3000), dims(720, 1080)),
                (dims(800, 600), dims(800, 600)),
            ]
        );
        assert_eq!(fs::read(out_dir.join("a.avif")).unwrap(), b"avif 1920x1280");
        assert_eq!(file_names(&out_dir), vec!["a.avif", "b.avif", "c.avif"]);
    }

    #[test]
    fn output_directory_uses_sanitized_album_name() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/raw");
        write_file(&album_dir.join("a.jpg"), &stub(10, 10));

        let report =
            normalize_album(&MockBackend::new(), &album_dir, "Trip: Rome?", &opts).unwrap();

        assert_eq!(report.album, "Trip: Rome?");
        assert!(opts.output_root.join("Trip_ Rome_/a.avif").is_file());
    }

    #[test]
    fn dot_named_image_is_normalized_like_any_other() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join(".p.jpg"), &stub(10, 10));

        let report = normalize_album(&MockBackend::new(), &album_dir, "Trip", &opts).unwrap();

        let out = opts.output_root.join("Trip/.p.avif");
        assert_eq!(report.outputs, vec![catalog_path(&out)]);
        assert!(out.is_file());
    }

    #[test]
    fn existing_output_is_reused_without_transcoding() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join("a.jpg"), &stub(3000, 2000));
        write_file(&album_dir.join("b.jpg"), &stub(100, 100));
        let existing = opts.output_root.join("Trip/a.avif");
        write_file(&existing, b"previous run");

        let backend = MockBackend::new();
        let report = normalize_album(&backend, &album_dir, "Trip", &opts).unwrap();

        assert_eq!((report.processed, report.skipped), (1, 1));
        assert_eq!(report.outputs[0], catalog_path(&existing));
        assert_eq!(fs::read(&existing).unwrap(), b"previous run");
        assert_eq!(backend.transcodes(), vec![(dims(100, 100), dims(100, 100))]);
    }

    #[test]
    fn force_retranscodes_existing_output() {
        let tmp = TempDir::new().unwrap();
        let opts = NormalizeOptions {
            force: true,
            ..options(tmp.path())
        };
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join("a.jpg"), &stub(3000, 2000));
        let existing = opts.output_root.join("Trip/a.avif");
        write_file(&existing, b"previous run");

        let report = normalize_album(&MockBackend::new(), &album_dir, "Trip", &opts).unwrap();

        assert_eq!((report.processed, report.skipped), (1, 0));
        assert_eq!(fs::read(&existing).unwrap(), b"avif 1920x1280");
    }

    #[test]
    fn failing_image_does_not_stop_the_album() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join("a.jpg"), &broken_stub(400, 300));
        write_file(&album_dir.join("b.jpg"), b"garbage");
        write_file(&album_dir.join("c.jpg"), &stub(400, 300));

        let report = normalize_album(&MockBackend::new(), &album_dir, "Trip", &opts).unwrap();

        assert_eq!((report.processed, report.skipped, report.failed), (1, 0, 2));
        let out_dir = opts.output_root.join("Trip");
        assert_eq!(report.outputs, vec![catalog_path(&out_dir.join("c.avif"))]);
        assert_eq!(file_names(&out_dir), vec!["c.avif"]);
    }

    #[test]
    fn album_without_images_creates_no_output_directory() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/Docs");
        write_file(&album_dir.join("readme.txt"), b"hi");

        let report = normalize_album(&MockBackend::new(), &album_dir, "Docs", &opts).unwrap();

        assert!(report.outputs.is_empty());
        assert!(!opts.output_root.join("Docs").exists());
    }

    #[test]
    fn missing_album_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let result = normalize_album(
            &MockBackend::new(),
            &tmp.path().join("extracted/Nope"),
            "Nope",
            &opts,
        );
        assert!(matches!(result, Err(NormalizeError::Io(_))));
    }

    #[test]
    fn unwritable_output_counts_as_failure() {
        let tmp = TempDir::new().unwrap();
        let opts = options(tmp.path());
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join("a.jpg"), &stub(10, 10));
        // a file where the album output directory should be
        write_file(&opts.output_root.join("Trip"), b"in the way");

        let report = normalize_album(&MockBackend::new(), &album_dir, "Trip", &opts).unwrap();

        assert_eq!((report.processed, report.failed), (0, 1));
        assert!(report.outputs.is_empty());
    }

    #[test]
    fn quality_and_limits_come_from_config() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_in(tmp.path());
        config.images.max_width = 1000;
        config.images.quality = 70;
        let opts = NormalizeOptions::from_config(&config, false);
        let album_dir = tmp.path().join("extracted/Trip");
        write_file(&album_dir.join("a.jpg"), &stub(2000, 1000));

        let backend = MockBackend::new();
        normalize_album(&backend, &album_dir, "Trip", &opts).unwrap();

        assert!(backend.get_operations().contains(
            &crate::imaging::backend::tests::RecordedOp::Transcode {
                source: dims(2000, 1000),
                target: dims(1000, 500),
                quality: 70,
            }
        ));
    }
}
