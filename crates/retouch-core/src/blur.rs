//! Gaussian blur driven by an odd kernel size.
//!
//! The blur slider is expressed as a kernel size (1, 3, 5, ...) rather
//! than a sigma. [`sigma_for_kernel`] converts one to the other with the
//! usual rule of thumb for automatic sigma selection, and
//! [`gaussian_blur_rgba`] wraps [`imageproc::filter::gaussian_blur_f32`]
//! per channel.

use image::GrayImage;

use crate::types::RgbaImage;

/// Normalize a requested kernel size: values below 1 become 1 (no blur)
/// and even values are promoted to the next odd value.
#[must_use]
pub fn normalize_kernel(kernel: i64) -> u32 {
    let k = u32::try_from(kernel.clamp(1, i64::from(u32::MAX - 1))).unwrap_or(1);
    if k % 2 == 0 { k + 1 } else { k }
}

/// Gaussian sigma for an odd kernel size.
///
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`. Returns `0.0` for a kernel of 1,
/// which [`gaussian_blur_rgba`] treats as "no blur".
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sigma_for_kernel(kernel: u32) -> f32 {
    if kernel <= 1 {
        return 0.0;
    }
    let k = kernel as f32;
    0.3f32.mul_add((k - 1.0).mul_add(0.5, -1.0), 0.8)
}

/// Blur an RGBA image with the Gaussian matching `kernel`.
///
/// A kernel of 1 (or less) returns an identical copy. Even kernels are
/// promoted to the next odd size first.
#[must_use = "returns the blurred image"]
pub fn blur(image: &RgbaImage, kernel: u32) -> RgbaImage {
    let kernel = normalize_kernel(i64::from(kernel));
    gaussian_blur_rgba(image, sigma_for_kernel(kernel))
}

/// Apply Gaussian blur to an RGBA image by blurring each channel
/// independently.
///
/// `imageproc::filter::gaussian_blur_f32` is applied to single-channel
/// images, so the RGBA image is split into four planes, each is
/// blurred, and the planes are reassembled. Gaussian blur is linear and
/// per-channel, so this matches blurring in colour space.
///
/// Non-positive or NaN sigma values return the image unchanged, since
/// `imageproc` panics on `sigma <= 0.0`.
#[must_use = "returns the blurred RGBA image"]
pub fn gaussian_blur_rgba(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma.is_nan() || sigma <= 0.0 {
        return image.clone();
    }

    map_planes(image, 4, |plane| {
        imageproc::filter::gaussian_blur_f32(plane, sigma)
    })
}

/// Run `f` over the first `planes` channels of `image` as grayscale
/// planes and reassemble. Channels at index `planes` and above are
/// copied through untouched.
pub(crate) fn map_planes(
    image: &RgbaImage,
    planes: usize,
    f: impl Fn(&GrayImage) -> GrayImage,
) -> RgbaImage {
    let (w, h) = (image.width(), image.height());

    let mapped: Vec<GrayImage> = (0..planes.min(4))
        .map(|c| {
            let plane = GrayImage::from_fn(w, h, |x, y| image::Luma([image.get_pixel(x, y).0[c]]));
            f(&plane)
        })
        .collect();

    RgbaImage::from_fn(w, h, |x, y| {
        let mut px = image.get_pixel(x, y).0;
        for (c, plane) in mapped.iter().enumerate() {
            px[c] = plane.get_pixel(x, y).0[0];
        }
        image::Rgba(px)
    })
}
