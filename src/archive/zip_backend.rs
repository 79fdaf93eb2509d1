//! Zip archives via the `zip` crate.

use super::backend::{ArchiveBackend, ArchiveError, ArchiveReader, EntryInfo};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;

/// Production archive backend for `.zip` bundles.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipBackend;

impl ZipBackend {
    pub fn new() -> Self {
        Self
    }
}

struct ZipReader {
    archive: ZipArchive<BufReader<File>>,
    entries: Vec<EntryInfo>,
}

impl ArchiveBackend for ZipBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn ArchiveReader>, ArchiveError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;
        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            // Raw access reads only the header; no decompressor is set up.
            let entry = archive.by_index_raw(index)?;
            entries.push(EntryInfo {
                index,
                name: entry.name().to_string(),
                is_dir: entry.is_dir(),
            });
        }
        Ok(Box::new(ZipReader { archive, entries }))
    }
}

impl ArchiveReader for ZipReader {
    fn entries(&self) -> &[EntryInfo] {
        &self.entries
    }

    fn read(&mut self, index: usize) -> Result<Vec<u8>, ArchiveError> {
        if index >= self.entries.len() {
            return Err(ArchiveError::IndexOutOfBounds(index));
        }
        let mut entry = self.archive.by_index(index)?;
        // The declared size is untrusted header data: grow as bytes arrive.
        let declared = entry.size();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        if bytes.len() as u64 != declared {
            return Err(ArchiveError::SizeMismatch {
                name: entry.name().to_string(),
                declared,
                actual: bytes.len() as u64,
            });
        }
        Ok(bytes)
    }
}
