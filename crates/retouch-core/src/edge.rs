//! Canny edge detection producing a displayable RGBA edge map.
//!
//! Wraps [`imageproc::edges::canny`] on the image's luminance. Edge
//! pixels are white, background is black, and the result is opaque so
//! it can be committed to history like any other edit.

use crate::grayscale::{gray_to_rgba, luminance};
use crate::types::RgbaImage;

/// Minimum allowed Canny threshold.
///
/// A low threshold of zero treats every pixel with any gradient as a
/// potential edge and lets hysteresis walk onto the zeroed border of
/// the suppressed gradient map.
pub const MIN_THRESHOLD: f32 = 1.0;
const _: () = assert!(MIN_THRESHOLD > 0.0);

/// Default low hysteresis threshold.
pub const DEFAULT_LOW_THRESHOLD: f32 = 100.0;

/// Default high hysteresis threshold.
pub const DEFAULT_HIGH_THRESHOLD: f32 = 200.0;

/// Clamp a threshold pair so both are at least [`MIN_THRESHOLD`] and
/// `low <= high`. Non-finite inputs fall back to the defaults.
#[must_use]
pub fn clamp_thresholds(low: f32, high: f32) -> (f32, f32) {
    let high = if high.is_finite() { high } else { DEFAULT_HIGH_THRESHOLD };
    let low = if low.is_finite() { low } else { DEFAULT_LOW_THRESHOLD };
    let high = high.max(MIN_THRESHOLD);
    let low = low.max(MIN_THRESHOLD).min(high);
    (low, high)
}

/// Detect edges using the Canny algorithm.
///
/// Returns an opaque RGBA image: white for edge pixels, black
/// otherwise. Thresholds go through [`clamp_thresholds`] first.
#[must_use = "returns the edge map"]
pub fn edge_detect(image: &RgbaImage, low_threshold: f32, high_threshold: f32) -> RgbaImage {
    let (low, high) = clamp_thresholds(low_threshold, high_threshold);
    let edges = imageproc::edges::canny(&luminance(image), low, high);
    gray_to_rgba(&edges)
}
