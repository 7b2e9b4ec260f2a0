//! Dartboard geometry model and score resolution.
//!
//! Pure lookups over board-centered coordinates (origin at the board
//! center, +Y toward sector 20, millimetre units). No camera, no state.

mod geometry;
mod score;

pub use geometry::{
    sector_center_angle, BOARD_RADIUS_MM, BULL_RADIUS, DOUBLE_INNER_RADIUS, DOUBLE_OUTER_RADIUS,
    HALF_SECTOR_DEG, INNER_BULL_RADIUS, SECTOR_DEG, SECTOR_ORDER, TRIPLE_INNER_RADIUS,
    TRIPLE_OUTER_RADIUS,
};
pub use score::{score_at_point, score_at_point_theta, sector_at_angle, Ring, Score};
