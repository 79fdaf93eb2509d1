//! Shared test utilities for the album-ingest test suite.
//!
//! Provides fixture builders (zip archives, synthetic encoded images) and a
//! config whose directory layout lives inside a temp dir.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = config_in(tmp.path());
//! write_zip(
//!     &config.paths.downloads.join("trip.zip"),
//!     &[zip_dir("Trip/"), zip_file("Trip/a.jpg", stub(800, 600))],
//! );
//! ```

use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

use crate::config::{PathsConfig, PipelineConfig};

pub use crate::imaging::backend::tests::{broken_stub, stub};

// =========================================================================
// Fixture setup
// =========================================================================

/// Default config with every path rooted inside `root`.
pub fn config_in(root: &Path) -> PipelineConfig {
    PipelineConfig {
        paths: PathsConfig::default().rooted_at(root),
        ..Default::default()
    }
}

/// One entry of a fixture archive.
#[derive(Debug, Clone)]
pub enum ZipEntry {
    File(String, Vec<u8>),
    Dir(String),
}

impl ZipEntry {
    pub fn name(&self) -> &str {
        match self {
            ZipEntry::File(name, _) | ZipEntry::Dir(name) => name,
        }
    }
}

pub fn zip_file(name: &str, data: impl AsRef<[u8]>) -> ZipEntry {
    ZipEntry::File(name.to_string(), data.as_ref().to_vec())
}

pub fn zip_dir(name: &str) -> ZipEntry {
    ZipEntry::Dir(name.to_string())
}

/// Write a zip archive with the given entries, in order.
pub fn write_zip(path: &Path, entries: &[ZipEntry]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for entry in entries {
        match entry {
            ZipEntry::File(name, bytes) => {
                zip.start_file(name.as_str(), SimpleFileOptions::default())
                    .unwrap();
                zip.write_all(bytes).unwrap();
            }
            ZipEntry::Dir(name) => {
                zip.add_directory(name.as_str(), SimpleFileOptions::default())
                    .unwrap();
            }
        }
    }
    zip.finish().unwrap();
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

// =========================================================================
// Synthetic images
// =========================================================================

/// A small valid JPEG with a gradient pattern.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// A small valid PNG with an alpha channel.
pub fn png_rgba_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, 200])
    });
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    bytes
}

// =========================================================================
// Directory inspection
// =========================================================================

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()))
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
