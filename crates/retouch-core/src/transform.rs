//! Geometric transforms and sharpening.
//!
//! Rotation and flip take typed arguments; parsing a raw angle or axis
//! name is where out-of-domain input is rejected. Resize validates its
//! percentage itself.

use std::fmt;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use imageproc::kernel::Kernel;
use serde::{Deserialize, Serialize};

use crate::types::{DomainError, RgbaImage};

/// Clockwise rotation by a quarter-turn multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// 90 degrees clockwise.
    Cw90,
    /// 180 degrees.
    Cw180,
    /// 270 degrees clockwise (90 counter-clockwise).
    Cw270,
}

impl Rotation {
    /// The angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }
}

impl TryFrom<i64> for Rotation {
    type Error = DomainError;

    fn try_from(degrees: i64) -> Result<Self, Self::Error> {
        match degrees {
            90 => Ok(Self::Cw90),
            180 => Ok(Self::Cw180),
            270 => Ok(Self::Cw270),
            other => Err(DomainError::InvalidRotation(other)),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Mirror axis for [`flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipAxis {
    /// Mirror left-to-right.
    Horizontal,
    /// Mirror top-to-bottom.
    Vertical,
}

impl FromStr for FlipAxis {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            _ => Err(DomainError::InvalidFlipAxis(s.to_string())),
        }
    }
}

impl fmt::Display for FlipAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Rotate clockwise by `rotation`.
#[must_use = "returns the rotated image"]
pub fn rotate(image: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::Cw90 => imageops::rotate90(image),
        Rotation::Cw180 => imageops::rotate180(image),
        Rotation::Cw270 => imageops::rotate270(image),
    }
}

/// Mirror along `axis`.
#[must_use = "returns the flipped image"]
pub fn flip(image: &RgbaImage, axis: FlipAxis) -> RgbaImage {
    match axis {
        FlipAxis::Horizontal => imageops::flip_horizontal(image),
        FlipAxis::Vertical => imageops::flip_vertical(image),
    }
}

/// Largest image [`resize`] will produce, in pixels.
pub const MAX_RESIZE_PIXELS: u64 = 1 << 26;

/// Target size for scaling `(width, height)` by `percent`.
///
/// Each side is truncated and never drops below 1 pixel.
///
/// # Errors
///
/// Returns [`DomainError::InvalidResizePercent`] when `percent` is not
/// a positive finite number, and [`DomainError::ResizeTooLarge`] when
/// the result would have more than [`MAX_RESIZE_PIXELS`] pixels.
pub fn scaled_dimensions(width: u32, height: u32, percent: f64) -> Result<(u32, u32), DomainError> {
    if !percent.is_finite() || percent <= 0.0 {
        return Err(DomainError::InvalidResizePercent(percent));
    }
    let scale = |side: u32| (f64::from(side) * percent / 100.0).floor().max(1.0);
    let (target_width, target_height) = (scale(width), scale(height));
    #[allow(clippy::cast_precision_loss)]
    let limit = MAX_RESIZE_PIXELS as f64;
    if target_width * target_height > limit {
        return Err(DomainError::ResizeTooLarge(percent));
    }
    // Both sides are now at most MAX_RESIZE_PIXELS.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target = (target_width as u32, target_height as u32);
    Ok(target)
}

/// Scale by `percent` of the current size using Lanczos resampling.
///
/// # Errors
///
/// Returns [`DomainError::InvalidResizePercent`] when `percent` is not
/// a positive finite number, and [`DomainError::ResizeTooLarge`] when
/// the result would be too large to allocate.
pub fn resize(image: &RgbaImage, percent: f64) -> Result<RgbaImage, DomainError> {
    let (width, height) = scaled_dimensions(image.width(), image.height(), percent)?;
    if (width, height) == image.dimensions() {
        return Ok(image.clone());
    }
    Ok(imageops::resize(image, width, height, FilterType::Lanczos3))
}

/// 3x3 sharpening kernel: centre 9, all eight neighbours -1.
const SHARPEN_3X3: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0];

/// Sharpen the colour channels with [`SHARPEN_3X3`]. Alpha is kept.
///
/// Pixels outside the image are taken from the nearest edge pixel.
#[must_use = "returns the sharpened image"]
pub fn sharpen(image: &RgbaImage) -> RgbaImage {
    crate::blur::map_planes(image, 3, |plane| {
        imageproc::filter::filter_clamped(plane, Kernel::new(SHARPEN_3X3.as_slice(), 3, 3))
    })
}
