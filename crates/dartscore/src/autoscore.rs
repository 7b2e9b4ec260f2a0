//! Tip stability tracking and confidence scoring.
//!
//! The engine runs once per captured frame. It never changes the computed
//! sector or ring; confidence only gates acceptance downstream.

use dartscore_board::{score_at_point_theta, Ring, Score};
use dartscore_core::{image_to_board, Homography};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Confidence assigned when the tip cannot be mapped onto the board plane.
const UNMAPPED_CONFIDENCE: f64 = 0.1;
/// Bonus for the narrow high-value rings, which a detector rarely hits by
/// accident.
const RING_BONUS: f64 = 0.05;
/// Confidence gained per consecutive stable frame.
const STABILITY_STEP: f64 = 0.03;
/// Stable frames counted toward the bonus.
const STABILITY_CAP: u32 = 5;

/// Per-session engine settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoscoreParams {
    /// Pixel radius within which consecutive tips count as the same dart.
    pub tip_radius_px: f64,
    /// Confidence floor for any mapped detection; also the acceptance gate.
    pub min_confidence: f64,
    /// Whole-sector rotation compensating a rotated board mount.
    pub sector_offset: i32,
}

impl Default for AutoscoreParams {
    fn default() -> Self {
        Self {
            tip_radius_px: 6.0,
            min_confidence: 0.8,
            sector_offset: 0,
        }
    }
}

/// Pure stability state: the last seen tip and how many consecutive frames
/// agreed with it.
///
/// A value type with a pure transition, so the stability logic is testable
/// without any detector attached.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TipTrack {
    pub last_tip: Option<Point2<f64>>,
    pub stable_count: u32,
}

impl TipTrack {
    /// Advance the track with a newly detected tip.
    ///
    /// Within `radius_px` of the previous tip the stable count grows;
    /// a jump outside it restarts the count at 1.
    pub fn observe(self, tip: Point2<f64>, radius_px: f64) -> TipTrack {
        let stable_count = match self.last_tip {
            Some(prev) if (tip - prev).norm() <= radius_px => self.stable_count + 1,
            _ => 1,
        };
        TipTrack {
            last_tip: Some(tip),
            stable_count,
        }
    }
}

/// A confidence-scored frame result, with the raw points kept for
/// observability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutoscoreResult {
    pub score: Score,
    /// In `[0, 1]`; gates acceptance, never alters the score.
    pub confidence: f64,
    pub pixel: Point2<f64>,
    pub board: Option<Point2<f64>>,
}

/// Stateful per-session scorer.
///
/// Owners must call [`reset`](Self::reset) whenever the calibration
/// changes, the camera session restarts, or scoring is interrupted (for
/// example by a recalibration overlay) — stale stability must never leak
/// across such boundaries.
#[derive(Clone, Debug)]
pub struct AutoscoreEngine {
    params: AutoscoreParams,
    track: TipTrack,
}

impl AutoscoreEngine {
    pub fn new(params: AutoscoreParams) -> Self {
        Self {
            params,
            track: TipTrack::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &AutoscoreParams {
        &self.params
    }

    #[inline]
    pub fn stable_count(&self) -> u32 {
        self.track.stable_count
    }

    /// Clear the stability track.
    pub fn reset(&mut self) {
        self.track = TipTrack::default();
    }

    /// Score one detected tip.
    ///
    /// `theta_deg`, when given (for example from the dart shaft angle),
    /// replaces the position angle for sector assignment.
    pub fn score_tip(
        &mut self,
        h: &Homography,
        tip: Point2<f64>,
        theta_deg: Option<f64>,
    ) -> AutoscoreResult {
        self.track = self.track.observe(tip, self.params.tip_radius_px);

        let Some(board) = image_to_board(h, tip) else {
            log::debug!("tip ({:.1},{:.1}) maps to infinity, scoring as miss", tip.x, tip.y);
            return AutoscoreResult {
                score: Score::MISS,
                confidence: UNMAPPED_CONFIDENCE,
                pixel: tip,
                board: None,
            };
        };

        let theta = theta_deg.unwrap_or_else(|| board.y.atan2(board.x).to_degrees());
        let score = score_at_point_theta(board, theta, self.params.sector_offset);
        let confidence = confidence_for(score.ring, self.track.stable_count, self.params.min_confidence);

        AutoscoreResult {
            score,
            confidence,
            pixel: tip,
            board: Some(board),
        }
    }
}

/// Composed convenience: map a pixel point and resolve its score in one
/// step, without stability tracking. A point that maps to infinity is a
/// miss, never a failure.
pub fn score_from_image_point(
    h: &Homography,
    pixel: Point2<f64>,
    theta_deg: Option<f64>,
) -> Score {
    match image_to_board(h, pixel) {
        Some(board) => {
            let theta = theta_deg.unwrap_or_else(|| board.y.atan2(board.x).to_degrees());
            score_at_point_theta(board, theta, 0)
        }
        None => Score::MISS,
    }
}

/// Monotone blend of a ring bonus and a capped stability bonus over the
/// configured floor.
fn confidence_for(ring: Ring, stable_count: u32, floor: f64) -> f64 {
    let ring_bonus = match ring {
        Ring::Triple | Ring::Double | Ring::InnerBull => RING_BONUS,
        Ring::Single | Ring::Bull | Ring::Miss => 0.0,
    };
    let stability = f64::from(stable_count.min(STABILITY_CAP)) * STABILITY_STEP;
    (floor + ring_bonus + stability).clamp(0.0, 1.0)
}
