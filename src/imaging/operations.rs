//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.
//! Output file names always reuse the source stem with a `.webp` extension.

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{ConvertParams, EncodeParams, ThumbnailParams};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    Ok(backend.identify(path)?.into())
}

/// `<output_dir>/<stem>.webp`
pub fn webp_output_path(output_dir: &Path, filename_stem: &str) -> PathBuf {
    output_dir.join(format!("{}.webp", filename_stem))
}

/// Outcome of a full-size conversion.
#[derive(Debug, Clone)]
pub struct Converted {
    pub output: PathBuf,
    /// Size of the source file on disk.
    pub original_size: u64,
    pub encoded: EncodedImage,
}

/// Re-encode `source` as a full-size WebP in `output_dir`.
pub fn convert_to_webp(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    filename_stem: &str,
    encode: EncodeParams,
) -> Result<Converted> {
    let original_size = std::fs::metadata(source)?.len();
    let output = webp_output_path(output_dir, filename_stem);

    let encoded = backend.convert(&ConvertParams {
        source: source.to_path_buf(),
        output: output.clone(),
        encode,
    })?;

    Ok(Converted {
        output,
        original_size,
        encoded,
    })
}

/// Configuration for thumbnail generation.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailConfig {
    /// Bounding box `(width, height)`; neither output edge exceeds it.
    pub max_size: (u32, u32),
    pub encode: EncodeParams,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_size: (400, 400),
            encode: EncodeParams {
                quality: super::Quality::new(80),
                ..EncodeParams::default()
            },
        }
    }
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(
    source: &Path,
    output_path: &Path,
    source_dims: (u32, u32),
    config: &ThumbnailConfig,
) -> ThumbnailParams {
    let (width, height) = calculate_fit_dimensions(source_dims, config.max_size);

    ThumbnailParams {
        source: source.to_path_buf(),
        output: output_path.to_path_buf(),
        width,
        height,
        encode: config.encode,
    }
}

/// Outcome of a thumbnail generation.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub output: PathBuf,
    pub source_dimensions: Dimensions,
    pub encoded: EncodedImage,
}

/// Create a bounded, aspect-preserving WebP thumbnail in `output_dir`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    filename_stem: &str,
    config: &ThumbnailConfig,
) -> Result<Thumbnail> {
    let source_dimensions = backend.identify(source)?;
    let output = webp_output_path(output_dir, filename_stem);

    let params = plan_thumbnail(source, &output, source_dimensions.into(), config);
    let encoded = backend.thumbnail(&params)?;

    Ok(Thumbnail {
        output,
        source_dimensions,
        encoded,
    })
}
