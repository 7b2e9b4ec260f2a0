//! Regulation board dimensions and sector layout.
//!
//! Radii follow WDF/BDO proportions in millimetres, measured from the board
//! center to the wire. The canonical board edge is `DOUBLE_OUTER_RADIUS`;
//! calibration board-space coordinates use the same unit.

/// Centre to the inner-bull (50) wire.
pub const INNER_BULL_RADIUS: f64 = 6.35;
/// Centre to the bull (25) wire.
pub const BULL_RADIUS: f64 = 15.9;
/// Centre to the inner edge of the treble band.
pub const TRIPLE_INNER_RADIUS: f64 = 99.0;
/// Centre to the outer edge of the treble band.
pub const TRIPLE_OUTER_RADIUS: f64 = 107.0;
/// Centre to the inner edge of the double band.
pub const DOUBLE_INNER_RADIUS: f64 = 162.0;
/// Centre to the outer edge of the double band; the scorable board edge.
pub const DOUBLE_OUTER_RADIUS: f64 = 170.0;

/// Canonical board radius, alias of [`DOUBLE_OUTER_RADIUS`].
pub const BOARD_RADIUS_MM: f64 = DOUBLE_OUTER_RADIUS;

/// Arc of one sector wedge, degrees.
pub const SECTOR_DEG: f64 = 18.0;
/// Half-sector offset used to quantize angles to the nearest wedge.
///
/// Fixed constant, pinned by the known-value scoring tests. Not a tunable.
pub const HALF_SECTOR_DEG: f64 = 9.0;

/// Sector numbers clockwise from 12 o'clock (sector 20 straight up).
pub const SECTOR_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Wedge-center angle of `sector` in board coordinates, degrees
/// (`atan2` convention: counterclockwise from +X, so sector 20 is at 90).
///
/// Returns `None` for numbers not on the board rim (including the bull).
pub fn sector_center_angle(sector: u8) -> Option<f64> {
    let idx = SECTOR_ORDER.iter().position(|&s| s == sector)?;
    Some(90.0 - idx as f64 * SECTOR_DEG)
}
