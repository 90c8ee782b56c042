//! Production image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` with content sniffing |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Alpha detection (PNG) | `png::Decoder::read_info` color type + tRNS |
//! | Color normalization | `into_rgb8` / `into_rgba8` |
//! | Encode → WebP | `webp::Encoder::encode_advanced` (libwebp, lossy, explicit `method`) |
//!
//! The `image` crate's own WebP encoder is lossless-only, which is why
//! encoding goes through libwebp.

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
use super::params::{ColorMode, ConvertParams, EncodeParams, ThumbnailParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Input extensions with decoders compiled in.
const DECODABLE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Whether `ext` names a format this backend can decode (case-insensitive).
pub fn is_decodable_extension(ext: &str) -> bool {
    DECODABLE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Backend built on `image` + libwebp.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    // Sniff the header so a mislabeled extension still decodes
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

fn decode_error(path: &Path, e: image::ImageError) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Load, decode and normalize an image from disk.
fn load_image(path: &Path) -> Result<(DynamicImage, ColorMode), BackendError> {
    let reader = open(path)?;
    let format = reader.format();
    let img = reader.decode().map_err(|e| decode_error(path, e))?;
    let mode = match format {
        Some(ImageFormat::Png) => png_color_mode(path)?,
        _ => ColorMode::for_alpha(img.color().has_alpha()),
    };
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        ?mode,
        "decoded"
    );
    Ok((normalize_color(img, mode), mode))
}

/// Color mode from the PNG header.
///
/// The decoder expands any tRNS chunk into an alpha channel. Only indexed
/// images count a tRNS chunk as transparency; an RGB or gray color key
/// stays opaque.
fn png_color_mode(path: &Path) -> Result<ColorMode, BackendError> {
    let file = BufReader::new(File::open(path)?);
    let reader = png::Decoder::new(file)
        .read_info()
        .map_err(|e| BackendError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let info = reader.info();
    let has_alpha = match info.color_type {
        png::ColorType::Rgba | png::ColorType::GrayscaleAlpha => true,
        png::ColorType::Indexed => info.trns.is_some(),
        png::ColorType::Rgb | png::ColorType::Grayscale => false,
    };
    Ok(ColorMode::for_alpha(has_alpha))
}

/// Map any decoded pixel format onto 8-bit RGB or RGBA.
fn normalize_color(img: DynamicImage, mode: ColorMode) -> DynamicImage {
    match mode {
        ColorMode::Rgba => DynamicImage::ImageRgba8(img.into_rgba8()),
        ColorMode::Rgb => DynamicImage::ImageRgb8(img.into_rgb8()),
    }
}

/// Encode a normalized image as lossy WebP.
fn encode_webp(img: &DynamicImage, encode: EncodeParams) -> Result<Vec<u8>, BackendError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| BackendError::Encode("libwebp rejected default config".into()))?;
    config.lossless = 0;
    config.quality = encode.quality.value() as f32;
    config.method = i32::from(encode.method.value());

    let (width, height) = (img.width(), img.height());
    let encoder = match img {
        DynamicImage::ImageRgba8(buf) => webp::Encoder::from_rgba(buf.as_raw(), width, height),
        DynamicImage::ImageRgb8(buf) => webp::Encoder::from_rgb(buf.as_raw(), width, height),
        other => {
            return Err(BackendError::Encode(format!(
                "unnormalized pixel layout {:?}",
                other.color()
            )));
        }
    };
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| BackendError::Encode(format!("{e:?}")))?;
    Ok(memory.to_vec())
}

/// Encode a normalized image and save to `path`, inferring format from
/// extension.
///
/// Returns what was written. An existing file is overwritten.
fn save_image(
    img: &DynamicImage,
    color_mode: ColorMode,
    path: &Path,
    encode: EncodeParams,
) -> Result<EncodedImage, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext != "webp" {
        return Err(BackendError::Encode(format!(
            "Unsupported output format: {}",
            ext
        )));
    }

    let bytes = encode_webp(img, encode)?;
    std::fs::write(path, &bytes)?;
    debug!(
        path = %path.display(),
        quality = encode.quality.value(),
        method = encode.method.value(),
        ?color_mode,
        channels = color_mode.channels(),
        bytes = bytes.len(),
        "encoded"
    );

    Ok(EncodedImage {
        bytes: bytes.len() as u64,
        dimensions: Dimensions {
            width: img.width(),
            height: img.height(),
        },
        color_mode,
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn convert(&self, params: &ConvertParams) -> Result<EncodedImage, BackendError> {
        let (img, mode) = load_image(&params.source)?;
        save_image(&img, mode, &params.output, params.encode)
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<EncodedImage, BackendError> {
        let (img, mode) = load_image(&params.source)?;

        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::Lanczos3)
        };

        save_image(&resized, mode, &params.output, params.encode)
    }
}
