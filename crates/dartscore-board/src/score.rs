use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::{
    BULL_RADIUS, DOUBLE_INNER_RADIUS, DOUBLE_OUTER_RADIUS, HALF_SECTOR_DEG, INNER_BULL_RADIUS,
    SECTOR_DEG, SECTOR_ORDER, TRIPLE_INNER_RADIUS, TRIPLE_OUTER_RADIUS,
};

/// Radial band a board point falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ring {
    Miss,
    Single,
    Double,
    Triple,
    Bull,
    InnerBull,
}

impl std::fmt::Display for Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Ring::Miss => "MISS",
            Ring::Single => "SINGLE",
            Ring::Double => "DOUBLE",
            Ring::Triple => "TRIPLE",
            Ring::Bull => "BULL",
            Ring::InnerBull => "INNER_BULL",
        };
        f.write_str(s)
    }
}

/// A resolved dart score.
///
/// Bulls carry their fixed value in `base` (25 / 50) with `mult = 1` and
/// report `sector` 25, so `value()` is uniformly `base * mult`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub base: u32,
    /// 0 for a miss, 1/2/3 for single/double/triple bands.
    pub mult: u32,
    pub ring: Ring,
    /// 1..=20, 25 for bulls, `None` for a miss.
    pub sector: Option<u8>,
}

impl Score {
    pub const MISS: Score = Score {
        base: 0,
        mult: 0,
        ring: Ring::Miss,
        sector: None,
    };

    /// Point value of the dart.
    #[inline]
    pub fn value(&self) -> u32 {
        self.base * self.mult
    }
}

/// Quantize an angle to a sector number.
///
/// `theta_deg` is the board angle in `atan2` convention (counterclockwise
/// from +X; sector 20 straight up at 90). The half-sector offset snaps to
/// the *nearest* wedge instead of truncating at wedge starts, which keeps
/// assignment robust right on a wire. `sector_offset` rotates the
/// assignment by whole sectors for physically rotated board mounts.
pub fn sector_at_angle(theta_deg: f64, sector_offset: i32) -> u8 {
    // clockwise angle from 12 o'clock
    let cw = (90.0 - theta_deg + HALF_SECTOR_DEG).rem_euclid(360.0);
    let idx = (cw / SECTOR_DEG) as i64 + sector_offset as i64;
    SECTOR_ORDER[idx.rem_euclid(20) as usize]
}

/// Resolve the score at a board-centered point.
///
/// The sector comes from the point's own polar angle. See
/// [`score_at_point_theta`] for the orientation-hint variant.
pub fn score_at_point(p: Point2<f64>) -> Score {
    let theta_deg = p.y.atan2(p.x).to_degrees();
    resolve(p.x.hypot(p.y), theta_deg, 0)
}

/// Resolve the score with an externally supplied orientation hint.
///
/// `theta_deg` (for example the dart shaft angle) replaces the point's
/// polar angle for sector assignment; the radius still comes from the
/// point. Useful when position alone is ambiguous near a wire.
pub fn score_at_point_theta(p: Point2<f64>, theta_deg: f64, sector_offset: i32) -> Score {
    resolve(p.x.hypot(p.y), theta_deg, sector_offset)
}

/// Band policy: the inner edge of each band is inclusive, so a point
/// exactly on a wire belongs to the higher-value ring.
fn resolve(r: f64, theta_deg: f64, sector_offset: i32) -> Score {
    if r > DOUBLE_OUTER_RADIUS {
        return Score::MISS;
    }
    if r <= INNER_BULL_RADIUS {
        return Score {
            base: 50,
            mult: 1,
            ring: Ring::InnerBull,
            sector: Some(25),
        };
    }
    if r <= BULL_RADIUS {
        return Score {
            base: 25,
            mult: 1,
            ring: Ring::Bull,
            sector: Some(25),
        };
    }

    let sector = sector_at_angle(theta_deg, sector_offset);
    let (ring, mult) = if (TRIPLE_INNER_RADIUS..=TRIPLE_OUTER_RADIUS).contains(&r) {
        (Ring::Triple, 3)
    } else if r >= DOUBLE_INNER_RADIUS {
        (Ring::Double, 2)
    } else {
        (Ring::Single, 1)
    };

    Score {
        base: sector as u32,
        mult,
        ring,
        sector: Some(sector),
    }
}
