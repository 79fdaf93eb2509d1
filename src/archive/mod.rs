//! Archive reading.
//!
//! The pipeline only needs three things from an archive: the ordered entry
//! list, each entry's directory flag, and an entry's raw bytes. Those are the
//! [`ArchiveBackend`] and [`ArchiveReader`] traits; [`ZipBackend`] is the
//! production implementation.

pub mod backend;
pub mod zip_backend;

pub use backend::{ArchiveBackend, ArchiveError, ArchiveReader, EntryInfo};
pub use zip_backend::ZipBackend;
