//! retouch-io: Filesystem load and save for retouch snapshots.
//!
//! The file format is chosen by extension. PNG, JPEG, BMP, and WebP are
//! supported; JPEG and BMP are written without alpha.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use retouch_core::Snapshot;
use tracing::{debug, info};

/// Errors that can occur while loading or saving an image.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file was empty.
    #[error("{0} is empty")]
    EmptyInput(PathBuf),

    /// The extension does not name a supported format.
    #[error("unsupported image format for {0} (expected png, jpg, jpeg, bmp, or webp)")]
    UnsupportedFormat(PathBuf),

    /// Decoding or encoding failed.
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Format for `path`, judged by its extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] when the extension is missing
/// or names a format other than PNG, JPEG, BMP, or WebP.
pub fn format_for(path: &Path) -> Result<ImageFormat, IoError> {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::WebP)) => {
            Ok(format)
        }
        _ => Err(IoError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Decode raw image bytes into an RGBA snapshot.
///
/// Any format the `image` crate was built with is accepted; the content,
/// not the file name, decides.
///
/// # Errors
///
/// Returns [`IoError::Codec`] if the data is not a decodable image.
pub fn decode(bytes: &[u8]) -> Result<Snapshot, IoError> {
    let image = image::load_from_memory(bytes)?;
    Ok(Snapshot::new(image.into_rgba8()))
}

/// Encode `snapshot` in `format`.
///
/// # Errors
///
/// Returns [`IoError::Codec`] if encoding fails.
pub fn encode(snapshot: &Snapshot, format: ImageFormat) -> Result<Vec<u8>, IoError> {
    let mut out = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg | ImageFormat::Bmp => {
            DynamicImage::ImageRgba8(snapshot.to_image())
                .to_rgb8()
                .write_to(&mut out, format)?;
        }
        _ => snapshot.as_image().write_to(&mut out, format)?,
    }
    Ok(out.into_inner())
}

/// Load the image at `path`.
///
/// # Errors
///
/// Returns [`IoError::Read`] if the file cannot be read,
/// [`IoError::EmptyInput`] if it is empty, and [`IoError::Codec`] if it
/// is not a decodable image.
pub fn load(path: impl AsRef<Path>) -> Result<Snapshot, IoError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(IoError::EmptyInput(path.to_path_buf()));
    }
    let snapshot = decode(&bytes)?;
    info!(path = %path.display(), dimensions = %snapshot.dimensions(), "loaded image");
    Ok(snapshot)
}

/// Save `snapshot` to `path` in the format named by its extension.
///
/// Nothing is written if the format is unsupported or encoding fails.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`], [`IoError::Codec`], or
/// [`IoError::Write`].
pub fn save(path: impl AsRef<Path>, snapshot: &Snapshot) -> Result<(), IoError> {
    let path = path.as_ref();
    let format = format_for(path)?;
    let bytes = encode(snapshot, format)?;
    debug!(?format, bytes = bytes.len(), "encoded image");
    std::fs::write(path, &bytes).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "saved image");
    Ok(())
}
