//! Pure calculation functions for image dimensions and size statistics.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` inside a `bound` box, preserving aspect ratio.
///
/// Images already within the box are returned unchanged (never upscaled).
/// The constraining edge lands exactly on the bound; the other edge is
/// rounded to the nearest pixel and never drops below 1.
///
/// # Examples
/// ```
/// # use webp_batch::imaging::calculate_fit_dimensions;
/// assert_eq!(calculate_fit_dimensions((3000, 2000), (400, 400)), (400, 267));
/// assert_eq!(calculate_fit_dimensions((300, 200), (400, 400)), (300, 200));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bound;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    // Compare src_w/src_h against max_w/max_h without floating point
    if src_w as u64 * max_h as u64 >= src_h as u64 * max_w as u64 {
        // Width is the constraining edge
        let h = (src_h as f64 * max_w as f64 / src_w as f64).round() as u32;
        (max_w, h.max(1))
    } else {
        // Height is the constraining edge
        let w = (src_w as f64 * max_h as f64 / src_h as f64).round() as u32;
        (w.max(1), max_h)
    }
}

/// Percentage saved by re-encoding: `(1 - encoded / original) * 100`.
///
/// Returns `None` for a zero-byte original, where the ratio is undefined.
/// Negative values mean the encoded file grew.
pub fn reduction_percent(original: u64, encoded: u64) -> Option<f64> {
    if original == 0 {
        return None;
    }
    Some((1.0 - encoded as f64 / original as f64) * 100.0)
}
