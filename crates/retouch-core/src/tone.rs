//! Brightness and contrast remapping.
//!
//! Both operate on the colour channels only; alpha passes through.

use image::Rgba;

use crate::types::RgbaImage;

/// Lower bound of the contrast gain.
pub const MIN_CONTRAST_GAIN: f32 = 0.5;

/// Upper bound of the contrast gain.
pub const MAX_CONTRAST_GAIN: f32 = 3.0;

/// Shift brightness by `delta` on the HSV value channel.
///
/// The value channel (`max(r, g, b)`) is moved by `delta` and saturated
/// to `0..=255`. Hue and saturation are kept, which amounts to scaling
/// each colour channel by `v' / v`. A black pixel has no hue, so raising
/// it produces the neutral gray `v'`.
#[must_use = "returns the adjusted image"]
pub fn adjust_brightness(image: &RgbaImage, delta: i32) -> RgbaImage {
    if delta == 0 {
        return image.clone();
    }

    let mut out = image.clone();
    for px in out.pixels_mut() {
        let [r, g, b, a] = px.0;
        let v = r.max(g).max(b);
        let shifted = (i32::from(v) + delta).clamp(0, 255);
        *px = if v == 0 {
            let level = saturate(shifted);
            Rgba([level, level, level, a])
        } else {
            let scale = |c: u8| saturate((i32::from(c) * shifted + i32::from(v) / 2) / i32::from(v));
            Rgba([scale(r), scale(g), scale(b), a])
        };
    }
    out
}

/// Contrast gain for a slider value in `-100..=100`.
///
/// `1 + delta / 100`, clamped to
/// [`MIN_CONTRAST_GAIN`]`..=`[`MAX_CONTRAST_GAIN`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn contrast_gain(delta: i32) -> f32 {
    (1.0 + delta as f32 / 100.0).clamp(MIN_CONTRAST_GAIN, MAX_CONTRAST_GAIN)
}

/// Scale every colour channel by [`contrast_gain`], rounding to nearest
/// and saturating.
#[must_use = "returns the adjusted image"]
pub fn adjust_contrast(image: &RgbaImage, delta: i32) -> RgbaImage {
    if delta == 0 {
        return image.clone();
    }

    let gain = contrast_gain(delta);
    let lut: [u8; 256] = std::array::from_fn(|i| {
        #[allow(clippy::cast_precision_loss)]
        let scaled = (i as f32 * gain).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = scaled.clamp(0.0, 255.0) as u8;
        level
    });

    let mut out = image.clone();
    for px in out.pixels_mut() {
        let [r, g, b, a] = px.0;
        *px = Rgba([lut[usize::from(r)], lut[usize::from(g)], lut[usize::from(b)], a]);
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn saturate(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}
