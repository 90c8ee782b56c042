//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: identify, convert, and thumbnail.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): `image` for decoding
//! and resampling, libwebp (via the `webp` crate) for lossy encoding.

use super::params::{ColorMode, ConvertParams, ThumbnailParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("WebP encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// What an encode actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedImage {
    /// Size of the output file in bytes.
    pub bytes: u64,
    pub dimensions: Dimensions,
    pub color_mode: ColorMode,
}

/// Trait for image processing backends.
///
/// Every backend must implement all three operations so the batch driver is
/// backend-agnostic.
pub trait ImageBackend {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, normalize color mode, encode full-size WebP.
    fn convert(&self, params: &ConvertParams) -> Result<EncodedImage, BackendError>;

    /// Decode, resize to the planned dimensions, normalize, encode WebP.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<EncodedImage, BackendError>;
}
