//! Run configuration.
//!
//! Configuration is layered: stock defaults are overridden by an optional
//! `config.toml` in the input directory, which is in turn overridden by CLI
//! flags. With neither file nor flags, a run behaves exactly like the stock
//! constants below.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [images]
//! quality = 85              # Full-size WebP quality (0-100)
//! method = 6                # libwebp effort (0 = fast, 6 = smallest)
//!
//! [thumbnails]
//! max_size = [400, 400]     # Bounding box [width, height]
//! quality = 80              # Thumbnail WebP quality (0-100)
//! method = 6
//!
//! [output]
//! images_dir = "images"     # Subdirectory for full-size output
//! thumbnails_dir = "thumbnails"
//!
//! [scan]
//! extensions = ["png", "jpg", "jpeg"]  # Matched case-sensitively
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::is_decodable_extension;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file inside the input directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full run configuration.
///
/// All fields have defaults. A config file only needs the values it wants
/// to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Full-size WebP encoding.
    pub images: ImagesConfig,
    /// Thumbnail bound and encoding.
    pub thumbnails: ThumbnailsConfig,
    /// Output subdirectory names.
    pub output: OutputConfig,
    /// Which files the scanner picks up.
    pub scan: ScanConfig,
}

/// Full-size encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub quality: u32,
    pub method: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 85,
            method: 6,
        }
    }
}

/// Thumbnail settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Bounding box as `[width, height]`.
    pub max_size: [u32; 2],
    pub quality: u32,
    pub method: u8,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_size: [400, 400],
            quality: 80,
            method: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub images_dir: String,
    pub thumbnails_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            images_dir: "images".to_string(),
            thumbnails_dir: "thumbnails".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
        }
    }
}

/// Values supplied on the command line. `None` leaves the file/stock value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub quality: Option<u32>,
    pub method: Option<u8>,
    pub thumbnail_quality: Option<u32>,
    pub thumbnail_size: Option<u32>,
}

fn validate_dir_name(key: &str, name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if !single_normal {
        return Err(ConfigError::Validation(format!(
            "{key} must be a single directory name, got {name:?}"
        )));
    }
    Ok(())
}

impl OptimizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.quality > 100 {
            return Err(ConfigError::Validation(
                "images.quality must be 0-100".into(),
            ));
        }
        if self.thumbnails.quality > 100 {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 0-100".into(),
            ));
        }
        if self.images.method > 6 || self.thumbnails.method > 6 {
            return Err(ConfigError::Validation("method must be 0-6".into()));
        }
        if self.thumbnails.max_size[0] == 0 || self.thumbnails.max_size[1] == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_size values must be non-zero".into(),
            ));
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .scan
            .extensions
            .iter()
            .find(|e| !is_decodable_extension(e))
        {
            return Err(ConfigError::Validation(format!(
                "scan.extensions: unsupported input format {ext:?} (png, jpg, jpeg only)"
            )));
        }
        validate_dir_name("output.images_dir", &self.output.images_dir)?;
        validate_dir_name("output.thumbnails_dir", &self.output.thumbnails_dir)?;
        if self.output.images_dir == self.output.thumbnails_dir {
            return Err(ConfigError::Validation(
                "output.images_dir and output.thumbnails_dir must differ".into(),
            ));
        }
        Ok(())
    }

    /// Apply CLI overrides on top of this config and re-validate.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(q) = overrides.quality {
            self.images.quality = q;
        }
        if let Some(m) = overrides.method {
            self.images.method = m;
            self.thumbnails.method = m;
        }
        if let Some(q) = overrides.thumbnail_quality {
            self.thumbnails.quality = q;
        }
        if let Some(size) = overrides.thumbnail_size {
            self.thumbnails.max_size = [size, size];
        }
        self.validate()?;
        Ok(self)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(OptimizerConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<OptimizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: OptimizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// A missing directory or file yields the stock defaults.
pub fn load_config(dir: &Path) -> Result<OptimizerConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# webp-batch configuration
# ========================
# Place this file as config.toml inside the directory being converted.
# All settings are optional; values shown are the defaults.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Full-size WebP output
# ---------------------------------------------------------------------------
[images]
# Lossy encoding quality (0 = smallest, 100 = best).
quality = 85

# libwebp compression effort (0 = fastest, 6 = slowest / smallest files).
method = 6

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Bounding box as [width, height]. Aspect ratio is preserved and images
# already inside the box are never upscaled.
max_size = [400, 400]

quality = 80
method = 6

# ---------------------------------------------------------------------------
# Output layout (created inside the input directory)
# ---------------------------------------------------------------------------
[output]
images_dir = "images"
thumbnails_dir = "thumbnails"

# ---------------------------------------------------------------------------
# Input selection
# ---------------------------------------------------------------------------
[scan]
# File extensions to convert, matched case-sensitively (add "PNG" etc. to
# pick up upper-case names).
extensions = ["png", "jpg", "jpeg"]
"##
}
