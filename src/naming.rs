//! Name handling shared by extraction and normalization.
//!
//! Archive entries use `/`-separated paths regardless of platform. The first
//! segment of the first entry names the album; only the last segment of each
//! entry names the extracted file, so nested folders collapse into one flat
//! album directory.
//!
//! ## Output Names
//!
//! Normalized outputs keep the source stem and swap the extension:
//! - `IMG_0001.JPG` → `IMG_0001.avif`
//! - `beach.day.png` → `beach.day.avif`
//!
//! Album names pass through [`sanitize_album_name`] before they are used as an
//! output directory:
//! - `Trip: Rome / 2020` → `Trip_ Rome _ 2020`

use sha2::{Digest, Sha256};
use std::path::Path;

/// Characters that are unsafe in a directory name on at least one platform.
const UNSAFE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Hex characters of the path hash appended to a colliding file name.
const COLLISION_HASH_LEN: usize = 8;

fn is_traversal(segment: &str) -> bool {
    segment == "." || segment == ".."
}

/// Album name encoded in an archive's entry list.
///
/// Scans entries in order and returns the first path segment of the first
/// entry whose leading segment is non-empty. `.` and `..` never count.
pub fn album_name_from_entries<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    names
        .into_iter()
        .filter_map(|name| name.split('/').next())
        .find(|first| !first.is_empty() && !is_traversal(first))
        .map(str::to_string)
}

/// Album name for an archive: from its entries, else the archive's file stem.
pub fn derive_album_name<'a>(
    names: impl IntoIterator<Item = &'a str>,
    archive_path: &Path,
) -> String {
    album_name_from_entries(names).unwrap_or_else(|| {
        archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Base file name of an archive entry (last `/` segment).
///
/// Returns `None` for directory-like names and traversal segments.
pub fn entry_file_name(entry_name: &str) -> Option<&str> {
    entry_name
        .rsplit('/')
        .next()
        .filter(|base| !base.is_empty() && !is_traversal(base))
}

/// Replace filesystem-unsafe characters with `_` and trim whitespace.
///
/// An album name that sanitizes to nothing becomes `_` so outputs never land
/// directly in the output root.
pub fn sanitize_album_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased extension of a file name, without the dot.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Whether `name` carries one of the (lowercase) `extensions`.
pub fn has_extension(name: &str, extensions: &[String]) -> bool {
    extension_of(name).is_some_and(|ext| extensions.iter().any(|e| *e == ext))
}

/// Output file name for a source image: same stem, new extension.
pub fn output_file_name(source_name: &str, output_extension: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_name.to_string());
    format!("{stem}.{output_extension}")
}

/// File name that keeps a colliding entry apart from its namesake.
///
/// `Album/b/photo.jpg` → `photo-<8 hex of sha256("Album/b/photo.jpg")>.jpg`.
pub fn disambiguated_name(file_name: &str, entry_path: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(entry_path.as_bytes()));
    let hash = &digest[..COLLISION_HASH_LEN];
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    match path.extension() {
        Some(ext) => format!("{stem}-{hash}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{hash}"),
    }
}
