//! Pipeline configuration.
//!
//! Handles loading and validating the pipeline's TOML config file. Every key
//! is optional: user values are merged over the stock defaults, so a config
//! file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! The binary reads `album-ingest.toml` from the working directory unless
//! `--config` points elsewhere. A missing file means "stock defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! downloads = "timeliner_repo/downloaded_albums"   # Archives to ingest
//! extracted = "timeliner_repo/extracted_albums"    # One directory per album
//! processed = "timeliner_repo/processed/downloaded" # Normalized output root
//! catalog = "index.json"                           # Album -> output paths
//!
//! [images]
//! max_width = 1920          # Landscape/square limit
//! max_height = 1080         # Portrait limit
//! quality = 90              # AVIF quality (1-100)
//! extensions = ["jpg", "jpeg", "png", "heic", "webp", "gif", "tiff", "bmp"]
//!
//! [archives]
//! extensions = ["zip"]
//! disambiguate_collisions = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name the binary looks for when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "album-ingest.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Locations of the three directory roots and the catalog file.
    pub paths: PathsConfig,
    /// Normalization settings (resize limits, quality, recognized types).
    pub images: ImagesConfig,
    /// Archive discovery and extraction settings.
    pub archives: ArchivesConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_width == 0 || self.images.max_height == 0 {
            return Err(ConfigError::Validation(
                "images.max_width and images.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "images.extensions must not be empty".into(),
            ));
        }
        if self.archives.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "archives.extensions must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Directory layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory scanned for archives. Never created by the pipeline.
    pub downloads: PathBuf,
    /// Extraction root: one sub-directory per album.
    pub extracted: PathBuf,
    /// Normalized-output root: one sub-directory per sanitized album name.
    pub processed: PathBuf,
    /// Catalog JSON file.
    pub catalog: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let repo = Path::new("timeliner_repo");
        Self {
            downloads: repo.join("downloaded_albums"),
            extracted: repo.join("extracted_albums"),
            processed: repo.join("processed").join("downloaded"),
            catalog: PathBuf::from("index.json"),
        }
    }
}

impl PathsConfig {
    /// Re-root every relative path under `base`. Absolute paths are kept.
    pub fn rooted_at(&self, base: &Path) -> Self {
        Self {
            downloads: base.join(&self.downloads),
            extracted: base.join(&self.extracted),
            processed: base.join(&self.processed),
            catalog: base.join(&self.catalog),
        }
    }
}

/// Normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Maximum output width for landscape and square images.
    pub max_width: u32,
    /// Maximum output height for portrait images.
    pub max_height: u32,
    /// AVIF encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Recognized image extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: 90,
            extensions: ["jpg", "jpeg", "png", "heic", "webp", "gif", "tiff", "bmp"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Archive discovery and extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchivesConfig {
    /// Archive extensions picked up from the downloads directory.
    pub extensions: Vec<String>,
    /// When two entries flatten to the same file name, keep both by suffixing
    /// the later one with a hash of its path inside the archive.
    pub disambiguate_collisions: bool,
}

impl Default for ArchivesConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["zip".to_string()],
            disambiguate_collisions: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: PipelineConfig = merged.try_into()?;
    config.images.extensions = normalize_extensions(&config.images.extensions);
    config.archives.extensions = normalize_extensions(&config.archives.extensions);
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to stock defaults when it
/// does not exist.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Lowercase and strip leading dots so `".JPG"` and `"jpg"` mean the same.
fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# album-ingest configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directory layout
# ---------------------------------------------------------------------------
[paths]
# Directory holding downloaded album archives. Skipped if it does not exist.
downloads = "timeliner_repo/downloaded_albums"

# Extraction root. Each archive becomes one album directory here; an existing
# album directory means "already extracted".
extracted = "timeliner_repo/extracted_albums"

# Normalized output root. One sub-directory per album.
processed = "timeliner_repo/processed/downloaded"

# Catalog file: album name -> list of normalized output paths.
catalog = "index.json"

# ---------------------------------------------------------------------------
# Normalization
# ---------------------------------------------------------------------------
[images]
# Landscape and square images are limited to this width.
max_width = 1920

# Portrait images are limited to this height.
max_height = 1080

# AVIF encoding quality (1 = worst, 100 = best).
quality = 90

# File extensions treated as images. Anything else is ignored.
extensions = ["jpg", "jpeg", "png", "heic", "webp", "gif", "tiff", "bmp"]

# ---------------------------------------------------------------------------
# Archives
# ---------------------------------------------------------------------------
[archives]
# Archive extensions picked up from the downloads directory.
extensions = ["zip"]

# Images from nested folders inside an archive are flattened into one album
# directory. When two of them share a file name the later one overwrites the
# earlier one; set this to keep both (the later gets a short hash suffix).
disambiguate_collisions = false
"##
}
