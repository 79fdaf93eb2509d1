//! Image normalization on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resize** | Lanczos3, bounded by width (landscape) or height (portrait) |
//! | **Encode** | AVIF via rav1e, quality from config |
//!
//! The module is split into:
//! - **Calculations**: Pure resize-policy math (unit testable)
//! - **Parameters**: Data structures describing a transcode
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{ResizeConstraint, ResizeLimits, choose_constraint, constrained_dimensions};
pub use operations::{NormalizedImage, normalize_image, plan_transcode};
pub use params::{Quality, TranscodeParams};
pub use rust_backend::RustBackend;
