//! Archive backend traits and shared types.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Entry index {0} out of bounds")]
    IndexOutOfBounds(usize),
    #[error("Entry {name} holds {actual} bytes but its header declares {declared}")]
    SizeMismatch {
        name: String,
        declared: u64,
        actual: u64,
    },
}

/// One entry of an opened archive, in container order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Position in the container, used to read the entry back.
    pub index: usize,
    /// Entry path as stored in the archive (`/`-separated).
    pub name: String,
    pub is_dir: bool,
}

/// Opens archives found in the downloads directory.
pub trait ArchiveBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>, ArchiveError>;
}

/// An opened archive.
pub trait ArchiveReader {
    /// All entries in container order.
    fn entries(&self) -> &[EntryInfo];

    /// Raw (decompressed) bytes of the entry at `index`.
    fn read(&mut self, index: usize) -> Result<Vec<u8>, ArchiveError>;
}
