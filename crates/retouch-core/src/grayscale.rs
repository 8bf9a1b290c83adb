//! Grayscale conversion that keeps the RGBA layout.
//!
//! History snapshots are always RGBA, so the luminance value is written
//! back into all three colour channels instead of producing a
//! single-channel image.

use image::{GrayImage, Rgba};

use crate::types::RgbaImage;

/// Luminance of an RGBA image as a single-channel buffer.
///
/// Alpha is ignored. Uses the `image` crate's weighted luminance, so
/// green contributes most and blue least.
#[must_use = "returns the luminance image"]
pub fn luminance(image: &RgbaImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Convert an image to grayscale, preserving alpha.
#[must_use = "returns the grayscale image"]
pub fn grayscale(image: &RgbaImage) -> RgbaImage {
    let luma = luminance(image);
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let l = luma.get_pixel(x, y).0[0];
        Rgba([l, l, l, image.get_pixel(x, y).0[3]])
    })
}

/// Expand a single-channel image into opaque RGBA.
#[must_use]
pub fn gray_to_rgba(gray: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(gray.width(), gray.height(), |x, y| {
        let l = gray.get_pixel(x, y).0[0];
        Rgba([l, l, l, 255])
    })
}
