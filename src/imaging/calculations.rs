//! Pure calculation functions for the resize policy.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// The single bound applied when normalizing an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeConstraint {
    /// Limit the width; height follows proportionally.
    MaxWidth(u32),
    /// Limit the height; width follows proportionally.
    MaxHeight(u32),
}

/// Resize limits from config: landscape/square images are bounded by width,
/// portrait images by height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeLimits {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
        }
    }
}

/// Pick the constraint for an image.
///
/// `width >= height` (landscape or square) → [`ResizeConstraint::MaxWidth`],
/// otherwise [`ResizeConstraint::MaxHeight`].
pub fn choose_constraint(source: Dimensions, limits: ResizeLimits) -> ResizeConstraint {
    if source.width >= source.height {
        ResizeConstraint::MaxWidth(limits.max_width)
    } else {
        ResizeConstraint::MaxHeight(limits.max_height)
    }
}

/// Output dimensions after applying `constraint` to `source`.
///
/// Never enlarges: an image already inside the bound keeps its dimensions.
/// The free edge is scaled proportionally and rounded, never below 1 pixel.
///
/// # Examples
/// ```
/// # use album_ingest::imaging::{Dimensions, ResizeConstraint, constrained_dimensions};
/// let landscape = Dimensions { width: 3000, height: 2000 };
/// assert_eq!(
///     constrained_dimensions(landscape, ResizeConstraint::MaxWidth(1920)),
///     Dimensions { width: 1920, height: 1280 }
/// );
/// ```
pub fn constrained_dimensions(source: Dimensions, constraint: ResizeConstraint) -> Dimensions {
    let Dimensions { width, height } = source;
    match constraint {
        ResizeConstraint::MaxWidth(max) if width > max => Dimensions {
            width: max,
            height: scale(height, max, width),
        },
        ResizeConstraint::MaxHeight(max) if height > max => Dimensions {
            width: scale(width, max, height),
            height: max,
        },
        _ => source,
    }
}

/// `value * numerator / denominator`, rounded, at least 1.
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (value as f64 * numerator as f64 / denominator as f64).round() as u32;
    scaled.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // choose_constraint tests
    // =========================================================================

    #[test]
    fn landscape_is_width_bound() {
        assert_eq!(
            choose_constraint(dims(3000, 2000), ResizeLimits::default()),
            ResizeConstraint::MaxWidth(1920)
        );
    }

    #[test]
    fn square_is_width_bound() {
        assert_eq!(
            choose_constraint(dims(500, 500), ResizeLimits::default()),
            ResizeConstraint::MaxWidth(1920)
        );
    }

    #[test]
    fn portrait_is_height_bound() {
        assert_eq!(
            choose_constraint(dims(2000, 3000), ResizeLimits::default()),
            ResizeConstraint::MaxHeight(1080)
        );
    }

    // =========================================================================
    // constrained_dimensions tests
    // =========================================================================

    #[test]
    fn landscape_downscales_to_max_width() {
        // 3000x2000 → 1920 wide, 2000 * 1920/3000 = 1280 high
        assert_eq!(
            constrained_dimensions(dims(3000, 2000), ResizeConstraint::MaxWidth(1920)),
            dims(1920, 1280)
        );
    }

    #[test]
    fn portrait_downscales_to_max_height() {
        // 2000x3000 → 1080 high, 2000 * 1080/3000 = 720 wide
        assert_eq!(
            constrained_dimensions(dims(2000, 3000), ResizeConstraint::MaxHeight(1080)),
            dims(720, 1080)
        );
    }

    #[test]
    fn small_image_is_never_enlarged() {
        assert_eq!(
            constrained_dimensions(dims(800, 600), ResizeConstraint::MaxWidth(1920)),
            dims(800, 600)
        );
        assert_eq!(
            constrained_dimensions(dims(600, 800), ResizeConstraint::MaxHeight(1080)),
            dims(600, 800)
        );
    }

    #[test]
    fn exactly_at_limit_is_unchanged() {
        assert_eq!(
            constrained_dimensions(dims(1920, 1080), ResizeConstraint::MaxWidth(1920)),
            dims(1920, 1080)
        );
    }

    #[test]
    fn extreme_panorama_keeps_at_least_one_pixel() {
        assert_eq!(
            constrained_dimensions(dims(100_000, 10), ResizeConstraint::MaxWidth(1920)),
            dims(1920, 1)
        );
    }

    #[test]
    fn rounding_is_to_nearest() {
        // 4000x3001 → 1920 x 1440.48 → 1440
        assert_eq!(
            constrained_dimensions(dims(4000, 3001), ResizeConstraint::MaxWidth(1920)),
            dims(1920, 1440)
        );
    }
}
