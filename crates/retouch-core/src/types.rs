//! Shared types for the retouch editing model.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can build and inspect
/// snapshots without depending on `image` directly.
pub use image::RgbaImage;

/// Number of channels in every snapshot buffer (8-bit RGBA).
pub const CHANNELS: u8 = 4;

/// An immutable, committed image state.
///
/// The pixel buffer sits behind an [`Arc`] so handing a snapshot to the
/// adjustment pipeline as its anchor does not copy pixels. No API hands
/// out mutable access to the buffer: callers that want to edit pixels
/// take an owned copy with [`to_image`](Self::to_image) (or
/// [`into_image`](Self::into_image)) and build a new snapshot from the
/// result.
///
/// Equality compares dimensions and pixel data, not identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot(Arc<RgbaImage>);

impl Snapshot {
    /// Wrap an owned image buffer as a snapshot.
    #[must_use]
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Number of channels per pixel. Always [`CHANNELS`].
    #[must_use]
    pub const fn channels(&self) -> u8 {
        CHANNELS
    }

    /// Image dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Read-only view of the pixel buffer.
    #[must_use]
    pub fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    /// An independent, owned copy of the pixel buffer.
    #[must_use]
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::clone(&self.0)
    }

    /// Consume the snapshot and return its pixel buffer, copying only
    /// when other handles to the same buffer are still alive.
    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        Arc::unwrap_or_clone(self.0)
    }

    /// Summary of the image's shape.
    #[must_use]
    pub fn info(&self) -> ImageInfo {
        let dimensions = self.dimensions();
        ImageInfo {
            width: dimensions.width,
            height: dimensions.height,
            channels: CHANNELS,
            size: self.0.as_raw().len(),
        }
    }

    /// Whether two snapshots share the same underlying buffer.
    #[must_use]
    pub fn shares_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<RgbaImage> for Snapshot {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

impl fmt::Debug for Snapshot {
    // Pixel data is omitted; it would flood test failure output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("channels", &CHANNELS)
            .finish_non_exhaustive()
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Shape summary reported for the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel.
    pub channels: u8,
    /// Total number of subpixel values (`width * height * channels`).
    pub size: usize,
}

/// Invalid configuration or parameter input.
///
/// Reported to the caller with no change to editor state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The named adjustment parameter does not exist.
    #[error("unknown adjustment parameter: {0:?}")]
    UnknownParameter(String),

    /// History capacity must hold at least one snapshot.
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    /// A configuration value is out of its valid domain.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Out-of-domain argument to a geometric transform.
///
/// Reported to the caller; history is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Rotation angle other than 90, 180, or 270 degrees.
    #[error("rotation angle must be 90, 180, or 270 degrees, got {0}")]
    InvalidRotation(i64),

    /// Flip axis other than horizontal or vertical.
    #[error("flip axis must be 'horizontal' or 'vertical', got {0:?}")]
    InvalidFlipAxis(String),

    /// Resize percentage that is zero, negative, or not finite.
    #[error("resize percentage must be a positive number, got {0}")]
    InvalidResizePercent(f64),

    /// Resize whose result would exceed [`MAX_RESIZE_PIXELS`](crate::transform::MAX_RESIZE_PIXELS).
    #[error(
        "resize by {0}% would exceed {max} pixels",
        max = crate::transform::MAX_RESIZE_PIXELS
    )]
    ResizeTooLarge(f64),
}

/// Errors surfaced by editing operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// See [`DomainError`].
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba([value, value, value, 255]))
    }

    #[test]
    fn snapshot_reports_shape() {
        let snapshot = Snapshot::new(solid(7, 3, 10));
        assert_eq!(snapshot.width(), 7);
        assert_eq!(snapshot.height(), 3);
        assert_eq!(snapshot.channels(), 4);
        assert_eq!(
            snapshot.info(),
            ImageInfo {
                width: 7,
                height: 3,
                channels: 4,
                size: 7 * 3 * 4,
            }
        );
    }

    #[test]
    fn to_image_is_independent_of_snapshot() {
        let snapshot = Snapshot::new(solid(2, 2, 10));
        let mut copy = snapshot.to_image();
        copy.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));

        assert_eq!(snapshot.as_image().get_pixel(0, 0).0, [10, 10, 10, 255]);
    }

    #[test]
    fn into_image_copies_when_shared() {
        let snapshot = Snapshot::new(solid(2, 2, 10));
        let handle = snapshot.clone();
        let mut owned = snapshot.into_image();
        owned.put_pixel(1, 1, image::Rgba([0, 0, 0, 0]));

        assert_eq!(handle.as_image().get_pixel(1, 1).0, [10, 10, 10, 255]);
    }

    #[test]
    fn clones_share_buffer_and_compare_equal() {
        let a = Snapshot::new(solid(2, 2, 10));
        let b = a.clone();
        assert!(a.shares_buffer(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn equality_is_by_pixels() {
        let a = Snapshot::new(solid(2, 2, 10));
        let b = Snapshot::new(solid(2, 2, 10));
        let c = Snapshot::new(solid(2, 2, 11));
        assert!(!a.shares_buffer(&b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn debug_omits_pixels() {
        let snapshot = Snapshot::new(solid(3, 4, 0));
        let text = format!("{snapshot:?}");
        assert!(text.contains("width: 3"), "got {text}");
        assert!(text.contains("height: 4"), "got {text}");
    }

    #[test]
    fn dimensions_display() {
        let d = Dimensions {
            width: 640,
            height: 480,
        };
        assert_eq!(d.to_string(), "640x480");
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ConfigError::UnknownParameter("gamma".to_string()).to_string(),
            "unknown adjustment parameter: \"gamma\"",
        );
        assert_eq!(
            DomainError::InvalidRotation(45).to_string(),
            "rotation angle must be 90, 180, or 270 degrees, got 45",
        );
        let wrapped: EditError = DomainError::InvalidResizePercent(-5.0).into();
        assert_eq!(
            wrapped.to_string(),
            "resize percentage must be a positive number, got -5",
        );
    }

    #[test]
    fn image_info_serde_round_trip() {
        let info = ImageInfo {
            width: 4,
            height: 5,
            channels: 4,
            size: 80,
        };
        let json = serde_json::to_string(&info).unwrap();
        let back: ImageInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
