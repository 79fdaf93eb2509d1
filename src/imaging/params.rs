//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations), which decides the
//! target size, and the [`backend`](super::backend), which does the pixel
//! work. A mock backend can then assert on exactly what was requested.

use super::backend::Dimensions;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Everything one transcode needs: final pixel size and quality.
///
/// `target` already has the resize policy applied, so a backend only has to
/// scale to it (a no-op when it equals the source size) and encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeParams {
    pub target: Dimensions,
    pub quality: Quality,
}
