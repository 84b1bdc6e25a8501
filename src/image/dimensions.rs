//! Pixel dimensions from an aspect ratio at a fixed pixel budget.

use crate::error::{GenPixError, Result};
use crate::image::types::AspectRatio;
use serde::{Deserialize, Serialize};

/// Default side length of the square whose area every image should match.
pub const DEFAULT_BASE_SIZE: u32 = 512;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total pixel count.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Scales `ratio` so that `width * height ≈ base_size²`.
///
/// Fails when a side would round to zero pixels or overflow `u32`.
pub fn image_dimensions(ratio: AspectRatio, base_size: u32) -> Result<Dimensions> {
    if base_size == 0 {
        return Err(GenPixError::InvalidInput("base size must be positive".into()));
    }

    let scale = f64::from(base_size) / (ratio.width * ratio.height).sqrt();
    let width = (ratio.width * scale).round();
    let height = (ratio.height * scale).round();

    let to_px = |v: f64| -> Option<u32> {
        (v.is_finite() && v >= 1.0 && v <= f64::from(u32::MAX)).then_some(v as u32)
    };

    match (to_px(width), to_px(height)) {
        (Some(width), Some(height)) => Ok(Dimensions { width, height }),
        _ => Err(GenPixError::InvalidAspectRatio(format!(
            "{ratio} is too extreme for a {base_size}px budget"
        ))),
    }
}
