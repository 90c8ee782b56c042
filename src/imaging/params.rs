//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to write where) and the [`backend`](super::backend)
//! (which does the actual pixel work). The split lets the batch driver be
//! tested with a mock backend.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy WebP quality (0-100, default 85). Clamped on construction.
//! - [`EncodeMethod`]: libwebp compression effort (0-6, default 6). Clamped on construction.
//! - [`EncodeParams`]: Quality + method pair shared by both outputs.
//! - [`ConvertParams`]: Full-size re-encode: source, output path, encoding.
//! - [`ThumbnailParams`]: Bounded re-encode: source, output, target dimensions, encoding.

use serde::Serialize;
use std::path::PathBuf;

/// Quality setting for lossy WebP encoding (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// libwebp `method`: 0 is fastest, 6 is the slowest and most thorough search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeMethod(pub u8);

impl EncodeMethod {
    pub const MAX: u8 = 6;

    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for EncodeMethod {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Encoder settings for one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams {
    pub quality: Quality,
    pub method: EncodeMethod,
}

/// Channel layout an image is normalized to before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// 3 channels, any alpha discarded.
    Rgb,
    /// 4 channels, transparency preserved.
    Rgba,
}

impl ColorMode {
    /// Select the target mode from whether the decoded source carries alpha.
    ///
    /// Palette images with a transparency chunk arrive here already expanded
    /// to an alpha-bearing buffer by the PNG decoder.
    pub fn for_alpha(has_alpha: bool) -> Self {
        if has_alpha { Self::Rgba } else { Self::Rgb }
    }

    pub fn channels(self) -> u8 {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Parameters for a full-size re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub encode: EncodeParams,
}

/// Parameters for a thumbnail re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final output dimensions, already fitted to the bound.
    pub width: u32,
    pub height: u32,
    pub encode: EncodeParams,
}
