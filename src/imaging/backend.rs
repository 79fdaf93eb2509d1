//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations normalization needs:
//! identify (read pixel dimensions) and transcode (scale + encode). Both take
//! the source image as raw bytes, so the caller owns all file I/O and the
//! atomic-write discipline that goes with it.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::TranscodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Pixel dimensions of an encoded image.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, scale to `params.target`, and encode in the output format.
    fn transcode(&self, data: &[u8], params: &TranscodeParams) -> Result<Vec<u8>, BackendError>;

    /// Extension (without dot) of files produced by [`transcode`](Self::transcode).
    fn output_extension(&self) -> &'static str;
}
