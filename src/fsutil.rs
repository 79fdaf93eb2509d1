//! Filesystem helpers: ordered directory listing and atomic writes.
//!
//! Every file the pipeline produces goes through [`write_atomic`], so a file
//! that exists at its final path is always complete. The existence checks in
//! extraction and normalization rely on this.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prefix of the hidden directory an album is staged in before it goes live.
pub const STAGING_PREFIX: &str = ".partial-";

/// Prefix of the temp file behind every [`write_atomic`].
pub const TEMP_PREFIX: &str = ".tmp-";

/// Whether a file name belongs to a write that is still in flight, or one
/// that was interrupted.
pub fn is_in_flight(name: &str) -> bool {
    name.starts_with(STAGING_PREFIX) || name.starts_with(TEMP_PREFIX)
}

/// Kind filter for [`list_entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Files,
    Dirs,
}

/// Immediate children of `dir` of the given kind, sorted by file name.
///
/// Staging directories and temp files ([`is_in_flight`]) are skipped. Other
/// dot-files are ordinary entries.
pub fn list_entries(dir: &Path, kind: EntryKind) -> io::Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::other)?;
        if is_in_flight(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let keep = match kind {
            EntryKind::Files => entry.file_type().is_file(),
            EntryKind::Dirs => entry.file_type().is_dir(),
        };
        if keep {
            entries.push(entry.into_path());
        }
    }
    Ok(entries)
}

/// Write `bytes` to `path` via a temp file in the same directory + rename.
///
/// Creates the parent directory if needed. Readers never observe a
/// partially written file at `path`.
///
/// A replaced file keeps its permissions. A new one gets the same mode as
/// `fs::write` would give it (`0666` minus the umask on unix).
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
