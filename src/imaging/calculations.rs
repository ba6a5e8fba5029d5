//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Orientation;

/// Target max dimension for a post asset: `percent` of the source width.
///
/// Never returns less than one pixel.
///
/// ```
/// # use trail_journal::imaging::scaled_max_dimension;
/// assert_eq!(scaled_max_dimension(4032, 50), 2016);
/// assert_eq!(scaled_max_dimension(1, 50), 1);
/// ```
pub fn scaled_max_dimension(source_width: u32, percent: u32) -> u32 {
    let scaled = (source_width as f64 * percent as f64 / 100.0).round();
    (scaled as u32).max(1)
}

/// Fit `source` inside a `max_dimension` box, preserving aspect ratio.
///
/// The longer edge becomes `max_dimension`; images that already fit are
/// returned unchanged. Neither edge drops below one pixel.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max_dimension` - Upper bound for the longer edge
///
/// # Returns
/// * `(width, height)` - Output dimensions
pub fn fit_within(source: (u32, u32), max_dimension: u32) -> (u32, u32) {
    let (w, h) = source;
    let longest = w.max(h);
    if longest <= max_dimension || longest == 0 {
        return (w, h);
    }

    let scale = max_dimension as f64 / longest as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    (new_w, new_h)
}

/// Dimensions of the image once `orientation` has been corrected.
pub fn upright_dimensions(stored: (u32, u32), orientation: Orientation) -> (u32, u32) {
    if orientation.swaps_axes() {
        (stored.1, stored.0)
    } else {
        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_max_dimension_halves_width() {
        assert_eq!(scaled_max_dimension(4000, 50), 2000);
        assert_eq!(scaled_max_dimension(101, 50), 51);
        assert_eq!(scaled_max_dimension(800, 100), 800);
    }

    #[test]
    fn fit_within_landscape_halves_both_edges() {
        // 50% of width as the max dimension → exact half for landscape
        assert_eq!(fit_within((4000, 3000), 2000), (2000, 1500));
    }

    #[test]
    fn fit_within_portrait_bounds_longer_edge() {
        // Portrait: height is the long edge, so it is the one pinned to max
        assert_eq!(fit_within((3000, 4000), 1500), (1125, 1500));
    }

    #[test]
    fn fit_within_smaller_image_unchanged() {
        assert_eq!(fit_within((640, 480), 1000), (640, 480));
        assert_eq!(fit_within((1000, 1000), 1000), (1000, 1000));
    }

    #[test]
    fn fit_within_never_collapses_to_zero() {
        assert_eq!(fit_within((1000, 1), 10), (10, 1));
    }

    #[test]
    fn upright_dimensions_swaps_for_quarter_turns() {
        assert_eq!(
            upright_dimensions((4032, 3024), Orientation::Rotate90),
            (3024, 4032)
        );
        assert_eq!(
            upright_dimensions((4032, 3024), Orientation::Rotate180),
            (4032, 3024)
        );
    }
}
