//! Image processing: decode, normalize, resize, encode WebP.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Convert → WebP** | `image` decode + libwebp lossy encode |
//! | **Thumbnail** | `resize_exact` (Lanczos3) into a bounded box, then encode |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math and size statistics (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, ImageBackend};
pub use calculations::{calculate_fit_dimensions, reduction_percent};
pub use operations::{
    Converted, Thumbnail, ThumbnailConfig, convert_to_webp, create_thumbnail, get_dimensions,
};
pub use params::{ColorMode, EncodeMethod, EncodeParams, Quality};
pub use rust_backend::{RustBackend, is_decodable_extension};
