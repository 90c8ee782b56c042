//! Batch conversion driver.
//!
//! Takes one input directory and, for every PNG/JPEG directly inside it,
//! writes a full-size WebP and a bounded WebP thumbnail.
//!
//! ## Default Configuration
//!
//! ```text
//! Full-size quality: 85, method 6
//! Thumbnail bound:   400x400 (aspect preserved, never upscaled)
//! Thumbnail quality: 80, method 6
//! ```
//!
//! ## Output Structure
//!
//! ```text
//! images/
//! ├── dawn.jpg
//! ├── map.png
//! ├── images/
//! │   ├── dawn.webp
//! │   └── map.webp
//! └── thumbnails/
//!     ├── dawn.webp
//!     └── map.webp
//! ```
//!
//! ## Failure Isolation
//!
//! A file that fails to decode, encode, or write is recorded as a
//! [`FileFailure`] and the batch moves on. Failed files add nothing to the
//! totals. Only a missing input directory or an unwritable output directory
//! stops the run.
//!
//! Files are processed one at a time in sorted path order. Progress is
//! reported through a caller-supplied observer, called synchronously.

use crate::config::OptimizerConfig;
use crate::imaging::{
    BackendError, ColorMode, EncodeMethod, EncodeParams, ImageBackend, Quality, RustBackend,
    ThumbnailConfig, convert_to_webp, create_thumbnail, reduction_percent,
};
use crate::scan::{self, OutputDirs, ScanError, SourceImage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Images directory not found at {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScanError> for ProcessError {
    fn from(e: ScanError) -> Self {
        match e {
            ScanError::NotFound(path) => Self::SourceNotFound(path),
            ScanError::Io(e) => Self::Io(e),
        }
    }
}

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub encode: EncodeParams,
    pub thumbnail: ThumbnailConfig,
    pub images_dir: String,
    pub thumbnails_dir: String,
    pub extensions: Vec<String>,
}

impl ProcessConfig {
    /// Build a ProcessConfig from the loaded run configuration.
    pub fn from_config(config: &OptimizerConfig) -> Self {
        let [max_w, max_h] = config.thumbnails.max_size;
        Self {
            encode: EncodeParams {
                quality: Quality::new(config.images.quality),
                method: EncodeMethod::new(config.images.method),
            },
            thumbnail: ThumbnailConfig {
                max_size: (max_w, max_h),
                encode: EncodeParams {
                    quality: Quality::new(config.thumbnails.quality),
                    method: EncodeMethod::new(config.thumbnails.method),
                },
            },
            images_dir: config.output.images_dir.clone(),
            thumbnails_dir: config.output.thumbnails_dir.clone(),
            extensions: config.scan.extensions.clone(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}

/// Everything recorded about one successfully converted image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    /// Source file stem, shared by both outputs.
    pub name: String,
    pub source: PathBuf,
    pub webp_path: PathBuf,
    pub thumbnail_path: PathBuf,
    pub original_size: u64,
    pub webp_size: u64,
    pub thumbnail_size: u64,
    /// Source dimensions (width, height).
    pub dimensions: (u32, u32),
    pub thumbnail_dimensions: (u32, u32),
    pub color_mode: ColorMode,
}

impl ImageReport {
    /// Full-size reduction; `None` for an empty source file.
    pub fn reduction_percent(&self) -> Option<f64> {
        reduction_percent(self.original_size, self.webp_size)
    }
}

/// A file the batch could not convert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub name: String,
    pub source: PathBuf,
    pub error: String,
}

/// Byte totals over successfully processed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub processed: usize,
    pub original: u64,
    pub webp: u64,
    pub thumbnail: u64,
}

impl RunTotals {
    pub fn record(&mut self, report: &ImageReport) {
        self.processed += 1;
        self.original += report.original_size;
        self.webp += report.webp_size;
        self.thumbnail += report.thumbnail_size;
    }

    /// Overall full-size reduction; `None` when nothing was measured.
    pub fn reduction_percent(&self) -> Option<f64> {
        reduction_percent(self.original, self.webp)
    }

    /// Bytes saved by the full-size outputs. Negative if they grew.
    pub fn bytes_saved(&self) -> i64 {
        self.original as i64 - self.webp as i64
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessResult {
    pub source_dir: PathBuf,
    pub images_dir: PathBuf,
    pub thumbnails_dir: PathBuf,
    /// Number of matching files the scan found.
    pub found: usize,
    pub images: Vec<ImageReport>,
    pub failures: Vec<FileFailure>,
    pub totals: RunTotals,
}

/// Progress notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Scan finished; `count` may be zero.
    Started { count: usize },
    ImageProcessed(ImageReport),
    ImageFailed(FileFailure),
}

/// Run the batch with the production backend.
pub fn process(
    source_dir: &Path,
    config: &ProcessConfig,
    on_event: impl FnMut(&ProcessEvent),
) -> Result<ProcessResult, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, source_dir, config, on_event)
}

/// Run the batch with a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    source_dir: &Path,
    config: &ProcessConfig,
    mut on_event: impl FnMut(&ProcessEvent),
) -> Result<ProcessResult, ProcessError> {
    if !source_dir.is_dir() {
        return Err(ProcessError::SourceNotFound(source_dir.to_path_buf()));
    }

    let dirs = scan::prepare_output_dirs(source_dir, &config.images_dir, &config.thumbnails_dir)?;
    let sources = scan::scan(source_dir, &config.extensions)?;
    info!(
        source = %source_dir.display(),
        count = sources.len(),
        "starting batch"
    );

    let mut result = ProcessResult {
        source_dir: source_dir.to_path_buf(),
        images_dir: dirs.images.clone(),
        thumbnails_dir: dirs.thumbnails.clone(),
        found: sources.len(),
        ..ProcessResult::default()
    };
    on_event(&ProcessEvent::Started {
        count: sources.len(),
    });

    for source in &sources {
        match process_image(backend, source, &dirs, config) {
            Ok(report) => {
                result.totals.record(&report);
                on_event(&ProcessEvent::ImageProcessed(report.clone()));
                result.images.push(report);
            }
            Err(e) => {
                warn!(file = %source.path.display(), error = %e, "image failed");
                let failure = FileFailure {
                    name: source.name.clone(),
                    source: source.path.clone(),
                    error: e.to_string(),
                };
                on_event(&ProcessEvent::ImageFailed(failure.clone()));
                result.failures.push(failure);
            }
        }
    }

    Ok(result)
}

/// Convert one source: full-size WebP first, then the thumbnail.
fn process_image(
    backend: &impl ImageBackend,
    source: &SourceImage,
    dirs: &OutputDirs,
    config: &ProcessConfig,
) -> Result<ImageReport, BackendError> {
    let converted = convert_to_webp(
        backend,
        &source.path,
        &dirs.images,
        &source.name,
        config.encode,
    )?;
    let thumbnail = create_thumbnail(
        backend,
        &source.path,
        &dirs.thumbnails,
        &source.name,
        &config.thumbnail,
    )?;

    Ok(ImageReport {
        name: source.name.clone(),
        source: source.path.clone(),
        webp_path: converted.output,
        thumbnail_path: thumbnail.output,
        original_size: converted.original_size,
        webp_size: converted.encoded.bytes,
        thumbnail_size: thumbnail.encoded.bytes,
        dimensions: thumbnail.source_dimensions.into(),
        thumbnail_dimensions: thumbnail.encoded.dimensions.into(),
        color_mode: converted.encoded.color_mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{
        MOCK_THUMB_BYTES, MOCK_WEBP_BYTES, MockBackend, RecordedOp,
    };
    use std::fs;
    use tempfile::TempDir;

    // =========================================================================
    // ProcessConfig tests
    // =========================================================================

    #[test]
    fn process_config_default_values() {
        let config = ProcessConfig::default();

        assert_eq!(config.encode.quality.value(), 85);
        assert_eq!(config.encode.method.value(), 6);
        assert_eq!(config.thumbnail.max_size, (400, 400));
        assert_eq!(config.thumbnail.encode.quality.value(), 80);
        assert_eq!(config.thumbnail.encode.method.value(), 6);
        assert_eq!(config.images_dir, "images");
        assert_eq!(config.thumbnails_dir, "thumbnails");
        assert_eq!(config.extensions, vec!["png", "jpg", "jpeg"]);
    }

    #[test]
    fn process_config_from_custom_values() {
        let mut site = OptimizerConfig::default();
        site.images.quality = 70;
        site.thumbnails.max_size = [320, 200];
        site.thumbnails.method = 2;
        site.output.thumbnails_dir = "thumbs".into();

        let config = ProcessConfig::from_config(&site);
        assert_eq!(config.encode.quality.value(), 70);
        assert_eq!(config.thumbnail.max_size, (320, 200));
        assert_eq!(config.thumbnail.encode.method.value(), 2);
        assert_eq!(config.thumbnails_dir, "thumbs");
    }

    // =========================================================================
    // Totals
    // =========================================================================

    fn report(original: u64, webp: u64, thumb: u64) -> ImageReport {
        ImageReport {
            name: "x".into(),
            source: PathBuf::from("x.png"),
            webp_path: PathBuf::from("images/x.webp"),
            thumbnail_path: PathBuf::from("thumbnails/x.webp"),
            original_size: original,
            webp_size: webp,
            thumbnail_size: thumb,
            dimensions: (10, 10),
            thumbnail_dimensions: (10, 10),
            color_mode: ColorMode::Rgb,
        }
    }

    #[test]
    fn totals_accumulate() {
        let mut totals = RunTotals::default();
        totals.record(&report(1000, 200, 20));
        totals.record(&report(3000, 800, 30));

        assert_eq!(totals.processed, 2);
        assert_eq!(totals.original, 4000);
        assert_eq!(totals.webp, 1000);
        assert_eq!(totals.thumbnail, 50);
        assert_eq!(totals.bytes_saved(), 3000);
        assert_eq!(totals.reduction_percent(), Some(75.0));
    }

    #[test]
    fn totals_guard_zero_original() {
        let totals = RunTotals::default();
        assert_eq!(totals.reduction_percent(), None);
        assert_eq!(totals.bytes_saved(), 0);
        assert_eq!(report(0, 40, 4).reduction_percent(), None);
    }

    #[test]
    fn bytes_saved_negative_when_output_grows() {
        let mut totals = RunTotals::default();
        totals.record(&report(100, 150, 10));
        assert_eq!(totals.bytes_saved(), -50);
    }

    #[test]
    fn result_serializes_for_json_report() {
        let mut result = ProcessResult {
            found: 1,
            ..ProcessResult::default()
        };
        let image = report(1000, 250, 40);
        result.totals.record(&image);
        result.images.push(image);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["found"], 1);
        assert_eq!(json["images"][0]["color_mode"], "rgb");
        assert_eq!(json["images"][0]["dimensions"], serde_json::json!([10, 10]));
        assert_eq!(json["totals"]["webp"], 250);
        assert!(json["failures"].as_array().unwrap().is_empty());
    }

    // =========================================================================
    // Process with mock backend tests
    // =========================================================================

    fn create_dummy_sources(dir: &Path, names: &[(&str, usize)]) {
        for (name, size) in names {
            fs::write(dir.join(name), vec![0u8; *size]).unwrap();
        }
    }

    #[test]
    fn process_with_mock_converts_every_file_in_order() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(tmp.path(), &[("b.png", 500), ("a.jpg", 1000), ("c.jpeg", 250)]);

        let backend = MockBackend::new();
        let result =
            process_with_backend(&backend, tmp.path(), &ProcessConfig::default(), |_| {}).unwrap();

        let names: Vec<&str> = result.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(result.found, 3);
        assert!(result.failures.is_empty());

        assert_eq!(result.totals.original, 1750);
        assert_eq!(result.totals.webp, 3 * MOCK_WEBP_BYTES);
        assert_eq!(result.totals.thumbnail, 3 * MOCK_THUMB_BYTES);

        let a = &result.images[0];
        assert_eq!(a.webp_path, tmp.path().join("images/a.webp"));
        assert_eq!(a.thumbnail_path, tmp.path().join("thumbnails/a.webp"));
    }

    #[test]
    fn process_with_mock_records_correct_operations() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(tmp.path(), &[("photo.jpg", 10)]);

        // 3000x2000 landscape → 400x267 thumbnail
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 3000,
            height: 2000,
        }]);

        let result =
            process_with_backend(&backend, tmp.path(), &ProcessConfig::default(), |_| {}).unwrap();

        let ops = backend.get_operations();
        // convert, identify, thumbnail
        assert_eq!(ops.len(), 3);
        assert!(matches!(
            &ops[0],
            RecordedOp::Convert { quality: 85, method: 6, output, .. } if output.ends_with("images/photo.webp")
        ));
        assert!(matches!(&ops[1], RecordedOp::Identify(_)));
        assert!(matches!(
            &ops[2],
            RecordedOp::Thumbnail { width: 400, height: 267, quality: 80, method: 6, output, .. }
                if output.ends_with("thumbnails/photo.webp")
        ));

        assert_eq!(result.images[0].dimensions, (3000, 2000));
        assert_eq!(result.images[0].thumbnail_dimensions, (400, 267));
    }

    #[test]
    fn process_continues_past_failing_file() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(tmp.path(), &[("a.png", 100), ("b.png", 200), ("c.png", 300)]);

        let backend = MockBackend::new().failing_on("b.png");
        let mut events = Vec::new();
        let result = process_with_backend(&backend, tmp.path(), &ProcessConfig::default(), |e| {
            events.push(e.clone())
        })
        .unwrap();

        let names: Vec<&str> = result.images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].name, "b");
        assert!(result.failures[0].error.contains("mock failure"));

        // Failed file contributes nothing
        assert_eq!(result.totals.processed, 2);
        assert_eq!(result.totals.original, 400);

        assert_eq!(events.len(), 4);
        assert_eq!(events[0], ProcessEvent::Started { count: 3 });
        assert!(matches!(&events[1], ProcessEvent::ImageProcessed(r) if r.name == "a"));
        assert!(matches!(&events[2], ProcessEvent::ImageFailed(f) if f.name == "b"));
        assert!(matches!(&events[3], ProcessEvent::ImageProcessed(r) if r.name == "c"));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failing_file_is_logged_at_warn() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(tmp.path(), &[("a.png", 100), ("b.png", 200)]);
        let backend = MockBackend::new().failing_on("b.png");

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            process_with_backend(&backend, tmp.path(), &ProcessConfig::default(), |_| {}).unwrap();
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.lines().count(), 1, "{output}");
        assert!(output.contains("WARN"));
        assert!(output.contains("image failed"));
        assert!(output.contains("b.png"));
    }

    #[test]
    fn process_empty_dir_reports_zero() {
        let tmp = TempDir::new().unwrap();
        let mut events = Vec::new();

        let result = process_with_backend(
            &MockBackend::new(),
            tmp.path(),
            &ProcessConfig::default(),
            |e| events.push(e.clone()),
        )
        .unwrap();

        assert_eq!(result.found, 0);
        assert_eq!(result.totals, RunTotals::default());
        assert_eq!(events, vec![ProcessEvent::Started { count: 0 }]);
        // Output directories are still created
        assert!(tmp.path().join("images").is_dir());
        assert!(tmp.path().join("thumbnails").is_dir());
    }

    #[test]
    fn process_source_not_found_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("images");

        let result =
            process_with_backend(&MockBackend::new(), &missing, &ProcessConfig::default(), |_| {});

        assert!(matches!(result, Err(ProcessError::SourceNotFound(p)) if p == missing));
        assert!(!missing.exists());
    }

    #[test]
    fn process_ignores_previous_outputs() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(tmp.path(), &[("a.png", 10)]);
        fs::create_dir_all(tmp.path().join("images")).unwrap();
        // A stray png inside an output dir must not be picked up
        fs::write(tmp.path().join("images/old.png"), b"x").unwrap();

        let result =
            process_with_backend(&MockBackend::new(), tmp.path(), &ProcessConfig::default(), |_| {})
                .unwrap();
        assert_eq!(result.found, 1);
    }

    #[test]
    fn process_twice_gives_identical_totals() {
        let tmp = TempDir::new().unwrap();
        create_dummy_sources(tmp.path(), &[("a.png", 10), ("b.jpg", 20)]);
        let config = ProcessConfig::default();

        let first = process_with_backend(&MockBackend::new(), tmp.path(), &config, |_| {}).unwrap();
        let second =
            process_with_backend(&MockBackend::new(), tmp.path(), &config, |_| {}).unwrap();

        assert_eq!(first.totals, second.totals);
        assert_eq!(first.images, second.images);
    }
}
