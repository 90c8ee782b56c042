//! Input directory scanning.
//!
//! Lists the images sitting directly inside one directory. The scan is
//! deliberately flat: the output subdirectories live inside the input
//! directory, so recursing would pick up previous results.
//!
//! ```text
//! images/                 # Input directory
//! ├── config.toml         # Optional run configuration (never scanned)
//! ├── dawn.jpg            # → images/dawn.webp, thumbnails/dawn.webp
//! ├── map.png
//! ├── notes.txt           # Ignored: extension not configured
//! ├── images/             # Full-size WebP output (created)
//! └── thumbnails/         # Thumbnail output (created)
//! ```
//!
//! Extension matching is case-sensitive: `DAWN.JPG` is only picked up when
//! `JPG` is listed in the configured extensions.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Images directory not found at {}", .0.display())]
    NotFound(PathBuf),
}

/// A source image discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    /// File stem; becomes the output file name.
    pub name: String,
    /// File size in bytes at scan time.
    pub size: u64,
}

/// Output directories for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub images: PathBuf,
    pub thumbnails: PathBuf,
}

/// Scan `root` for files whose extension is one of `extensions`.
///
/// Non-recursive. Results are sorted by path so runs are deterministic.
pub fn scan(root: &Path, extensions: &[String]) -> Result<Vec<SourceImage>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();

        if !matches_extension(&path, extensions) {
            continue;
        }
        // Follows symlinks; dangling links and directories are skipped
        let meta = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => meta,
            _ => continue,
        };
        let Some(stem) = path.file_stem() else {
            continue;
        };

        images.push(SourceImage {
            name: stem.to_string_lossy().into_owned(),
            size: meta.len(),
            path,
        });
    }

    images.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(root = %root.display(), count = images.len(), "scanned");
    Ok(images)
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want == ext))
}

/// Create `<root>/<images_dir>` and `<root>/<thumbnails_dir>`.
///
/// Idempotent: existing directories are left as they are.
pub fn prepare_output_dirs(
    root: &Path,
    images_dir: &str,
    thumbnails_dir: &str,
) -> Result<OutputDirs, ScanError> {
    let dirs = OutputDirs {
        images: root.join(images_dir),
        thumbnails: root.join(thumbnails_dir),
    };
    fs::create_dir_all(&dirs.images)?;
    fs::create_dir_all(&dirs.thumbnails)?;
    Ok(dirs)
}
