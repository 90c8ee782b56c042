//! Shared test utilities: synthetic source images written to disk.
//!
//! Gradients rather than flat fills so encoders have real content to work
//! with. Alpha variants carry genuine transparency; libwebp drops the alpha
//! plane of fully opaque input.

use image::{ImageEncoder, ImageFormat, LumaA, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

fn gradient(x: u32, y: u32) -> [u8; 3] {
    [(x % 256) as u8, (y % 256) as u8, 128]
}

/// Create a valid baseline JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb(gradient(x, y)));
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create an RGBA PNG whose left half is semi-transparent.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = gradient(x, y);
        let a = if x < width / 2 { 64 } else { 255 };
        Rgba([r, g, b, a])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

/// Create a grayscale + alpha PNG with a transparent top half.
pub fn create_test_png_la(path: &Path, width: u32, height: u32) {
    image::ImageBuffer::from_fn(width, height, |x, y| {
        let a = if y < height / 2 { 0 } else { 255 };
        LumaA([((x + y) % 256) as u8, a])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

/// Write 8-bit PNG samples with optional PLTE and tRNS chunks.
fn write_png_raw(
    path: &Path,
    (width, height): (u32, u32),
    color: png::ColorType,
    palette: Option<Vec<u8>>,
    trns: Option<Vec<u8>>,
    data: &[u8],
) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    if let Some(palette) = palette {
        encoder.set_palette(palette);
    }
    if let Some(trns) = trns {
        encoder.set_trns(trns);
    }
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(data).unwrap();
    writer.finish().unwrap();
}

/// Create a 4-color indexed PNG, striped by column.
///
/// With `transparent`, a tRNS chunk makes palette entry 0 fully transparent
/// and entry 1 half transparent.
pub fn create_test_png_indexed(path: &Path, width: u32, height: u32, transparent: bool) {
    let palette = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 240, 240, 240];
    let data: Vec<u8> = (0..height)
        .flat_map(|_| (0..width).map(|x| ((x / 4) % 4) as u8))
        .collect();
    let trns = transparent.then(|| vec![0u8, 128]);
    write_png_raw(path, (width, height), png::ColorType::Indexed, Some(palette), trns, &data);
}

/// Create an RGB PNG whose tRNS chunk names a color key present in the image.
pub fn create_test_png_rgb_keyed(path: &Path, width: u32, height: u32) {
    let data: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).flat_map(move |x| gradient(x, y)))
        .collect();
    // Key (0, 0, 128) as 16-bit samples; matches the origin pixel
    let trns = vec![0u8, 0, 0, 0, 0, 128];
    write_png_raw(path, (width, height), png::ColorType::Rgb, None, Some(trns), &data);
}
