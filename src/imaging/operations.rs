//! High-level image operations.
//!
//! These functions combine the resize policy with backend execution.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{ResizeLimits, choose_constraint, constrained_dimensions};
use super::params::{Quality, TranscodeParams};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// A normalized image, ready to be written.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub source: Dimensions,
    pub target: Dimensions,
    pub bytes: Vec<u8>,
}

/// Plan a transcode without executing it.
pub fn plan_transcode(
    source: Dimensions,
    limits: ResizeLimits,
    quality: Quality,
) -> TranscodeParams {
    let constraint = choose_constraint(source, limits);
    TranscodeParams {
        target: constrained_dimensions(source, constraint),
        quality,
    }
}

/// Identify, plan, and transcode one image.
pub fn normalize_image(
    backend: &impl ImageBackend,
    data: &[u8],
    limits: ResizeLimits,
    quality: Quality,
) -> Result<NormalizedImage> {
    let source = backend.identify(data)?;
    if source.width == 0 || source.height == 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "Image reports empty dimensions {}x{}",
            source.width, source.height
        )));
    }
    let params = plan_transcode(source, limits, quality);
    let bytes = backend.transcode(data, &params)?;
    Ok(NormalizedImage {
        source,
        target: params.target,
        bytes,
    })
}
