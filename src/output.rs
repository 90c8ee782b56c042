//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Found 2 image files to convert
//!
//! ============================================================
//! dawn
//!   Original: 4.77 MB
//!   WebP:     512 KB (90% smaller)
//!   Thumb:    18 KB
//!
//! Error processing broken: Failed to decode images/broken.png: ...
//! ============================================================
//!
//! SUMMARY
//!   Original images: 4.77 MB
//!   WebP files:      0.50 MB (90% reduction)
//!   Thumbnails:      0.02 MB
//!
//!   Total savings:   4.27 MB
//!   Failed:          1 file
//!
//! Optimized images saved to: images/images
//! Thumbnails saved to: images/thumbnails
//! ```
//!
//! Sizes use binary units: KB is bytes / 1024, MB is bytes / 1024².
//! A reduction over a zero-byte original is shown as `n/a`.
//!
//! # Architecture
//!
//! Each `format_*` function returns `Vec<String>` for testability and has a
//! `print_*` wrapper that writes to stdout. Format functions are pure and do no
//! I/O.

use crate::process::{ImageReport, ProcessError, ProcessEvent, ProcessResult};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn megabytes(bytes: f64) -> String {
    format!("{:.2} MB", bytes / 1024.0 / 1024.0)
}

fn kilobytes(bytes: u64) -> String {
    format!("{:.0} KB", bytes as f64 / 1024.0)
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(p) => format!("{:.0}%", p),
        None => "n/a".to_string(),
    }
}

fn image_lines(report: &ImageReport) -> Vec<String> {
    vec![
        report.name.clone(),
        format!("  Original: {}", megabytes(report.original_size as f64)),
        format!(
            "  WebP:     {} ({} smaller)",
            kilobytes(report.webp_size),
            percent(report.reduction_percent())
        ),
        format!("  Thumb:    {}", kilobytes(report.thumbnail_size)),
        String::new(),
    ]
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { count: 0 } => vec!["No image files found to convert.".to_string()],
        ProcessEvent::Started { count } => vec![
            format!("Found {} image files to convert", count),
            String::new(),
            rule(),
        ],
        ProcessEvent::ImageProcessed(report) => image_lines(report),
        ProcessEvent::ImageFailed(failure) => {
            vec![format!("Error processing {}: {}", failure.name, failure.error)]
        }
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

/// Format the run-wide summary.
///
/// Empty when the scan found nothing; the start event already said so.
pub fn format_summary(result: &ProcessResult) -> Vec<String> {
    if result.found == 0 {
        return Vec::new();
    }
    let totals = &result.totals;

    let mut lines = vec![
        rule(),
        String::new(),
        "SUMMARY".to_string(),
        format!("  Original images: {}", megabytes(totals.original as f64)),
        format!(
            "  WebP files:      {} ({} reduction)",
            megabytes(totals.webp as f64),
            percent(totals.reduction_percent())
        ),
        format!("  Thumbnails:      {}", megabytes(totals.thumbnail as f64)),
        String::new(),
        format!("  Total savings:   {}", megabytes(totals.bytes_saved() as f64)),
    ];

    match result.failures.len() {
        0 => {}
        1 => lines.push("  Failed:          1 file".to_string()),
        n => lines.push(format!("  Failed:          {} files", n)),
    }

    lines.push(String::new());
    lines.push(format!(
        "Optimized images saved to: {}",
        result.images_dir.display()
    ));
    lines.push(format!(
        "Thumbnails saved to: {}",
        result.thumbnails_dir.display()
    ));
    lines
}

/// Print the summary to stdout.
pub fn print_summary(result: &ProcessResult) {
    for line in format_summary(result) {
        println!("{}", line);
    }
}

/// Message for a run that aborted before converting anything.
///
/// Plain `Error: ...` text, or a `{"error": ...}` object when the report is
/// JSON so stdout stays parseable.
pub fn format_run_error(error: &ProcessError, json: bool) -> String {
    if json {
        serde_json::json!({ "error": error.to_string() }).to_string()
    } else {
        format!("Error: {}", error)
    }
}
