//! Fixed board-space anchor points for calibration markers.
//!
//! The printable calibration sheet places one marker per id on a square
//! around the board face, clear of the double ring. Board coordinates are
//! millimetres, origin at the board center, +Y toward sector 20.

use dartscore_core::Correspondence;
use nalgebra::Point2;

/// Half side length of the anchor square, millimetres.
const ANCHOR_HALF_SIDE: f64 = 220.0;

/// Number of markers on the calibration sheet.
pub const ANCHOR_COUNT: u32 = 8;

/// Anchor centers by marker id, clockwise from the top-left corner:
/// corners interleaved with edge midpoints.
pub const ANCHORS: [(u32, [f64; 2]); ANCHOR_COUNT as usize] = [
    (0, [-ANCHOR_HALF_SIDE, ANCHOR_HALF_SIDE]),
    (1, [0.0, ANCHOR_HALF_SIDE]),
    (2, [ANCHOR_HALF_SIDE, ANCHOR_HALF_SIDE]),
    (3, [ANCHOR_HALF_SIDE, 0.0]),
    (4, [ANCHOR_HALF_SIDE, -ANCHOR_HALF_SIDE]),
    (5, [0.0, -ANCHOR_HALF_SIDE]),
    (6, [-ANCHOR_HALF_SIDE, -ANCHOR_HALF_SIDE]),
    (7, [-ANCHOR_HALF_SIDE, 0.0]),
];

/// Board-space anchor for a calibration marker id, `None` for ids not on
/// the sheet.
pub fn anchor_point(id: u32) -> Option<Point2<f64>> {
    ANCHORS
        .iter()
        .find(|(anchor_id, _)| *anchor_id == id)
        .map(|(_, p)| Point2::new(p[0], p[1]))
}

/// Join detected marker centers `(id, pixel)` with their board anchors.
///
/// Unknown ids are skipped; the result feeds
/// [`dartscore_core::estimate_homography`] directly.
pub fn anchor_correspondences(detections: &[(u32, Point2<f64>)]) -> Vec<Correspondence> {
    detections
        .iter()
        .filter_map(|&(id, pixel)| {
            anchor_point(id).map(|board| Correspondence { pixel, board })
        })
        .collect()
}
