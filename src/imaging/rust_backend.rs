//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::load_from_memory` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → AVIF | `image::codecs::avif::AvifEncoder` (rav1e, speed 6) |
//!
//! HEIC is a recognized extension but has no decoder here; such files fail
//! to transcode and are reported per image.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::TranscodeParams;
use image::codecs::avif::AvifEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Extension of every file this backend produces.
pub const OUTPUT_EXTENSION: &str = "avif";

/// rav1e speed preset: 1 is slowest/best, 10 fastest.
const AVIF_SPEED: u8 = 6;

/// Pure Rust backend using the `image` crate ecosystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

fn decode(data: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(data)
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode: {e}")))
}

/// Encode as AVIF. 8-bit RGB(A) is the encoder's common denominator, so
/// other pixel layouts are converted first.
fn encode_avif(img: DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let img = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };
    let mut bytes = Vec::new();
    let encoder = AvifEncoder::new_with_speed_quality(&mut bytes, AVIF_SPEED, quality as u8);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("AVIF encode failed: {e}")))?;
    Ok(bytes)
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {e}"))
            })?;
        Ok(Dimensions { width, height })
    }

    fn transcode(&self, data: &[u8], params: &TranscodeParams) -> Result<Vec<u8>, BackendError> {
        let img = decode(data)?;
        let target = params.target;
        let scaled = if img.width() == target.width && img.height() == target.height {
            img
        } else {
            img.resize_exact(target.width, target.height, FilterType::Lanczos3)
        };
        encode_avif(scaled, params.quality.value())
    }

    fn output_extension(&self) -> &'static str {
        OUTPUT_EXTENSION
    }
}
