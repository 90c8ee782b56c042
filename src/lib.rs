//! # webp-batch
//!
//! Batch-converts a directory of PNG/JPEG images into WebP, producing a
//! full-size re-encode and a bounded thumbnail for each file, and reports
//! how many bytes the conversion saved.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      images/*.{png,jpg,jpeg}       (flat, sorted, case-sensitive)
//! 2. Convert   decode → RGB/RGBA → WebP      → images/images/<stem>.webp
//! 3. Thumbnail decode → fit 400x400 → WebP   → images/thumbnails/<stem>.webp
//! 4. Report    per-file sizes + run totals   → stdout
//! ```
//!
//! Work is strictly sequential. A file that fails at any step is reported
//! and skipped without stopping the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered settings: stock defaults, `config.toml`, CLI overrides |
//! | [`scan`] | Lists source images and creates the output directories |
//! | [`imaging`] | Dimension math, `ImageBackend` trait, `image` + libwebp backend |
//! | [`process`] | Batch driver: per-file isolation, totals, progress events |
//! | [`output`] | Text report formatting |
//! | [`logging`] | `tracing` subscriber for stderr diagnostics |
//!
//! # Design Decisions
//!
//! ## Lossy WebP through libwebp
//!
//! The `image` crate decodes everything we need and does the Lanczos3
//! resampling, but its WebP encoder is lossless-only. Encoding therefore
//! goes through the `webp` crate, which exposes libwebp's `quality` and
//! `method` knobs. Both outputs use method 6, the slowest and most thorough
//! compression search.
//!
//! ## Color normalization
//!
//! Sources with any alpha (RGBA, gray + alpha, palette + transparency) are
//! encoded as RGBA; everything else as RGB. 16-bit sources are reduced to
//! 8 bits per channel on the way.
//!
//! ## No caching
//!
//! Every run reprocesses every file and overwrites earlier outputs. Running
//! twice on unchanged input yields the same files and the same totals.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
