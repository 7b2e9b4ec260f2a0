//! One-frame detection orchestration.
//!
//! The entry point runs synchronously inside the owner's frame loop:
//! detect a tip, gate on the detector's raw confidence, map and score
//! through the engine, then hand the dart to the acceptance sink. The
//! owner serializes frame dispatch; nothing here re-enters.
//!
//! A sink rejection is deliberately swallowed (logged, reported in the
//! [`NotifyOutcome`]) — a refused commit must never break the frame loop.

use dartscore_board::Ring;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{AutoscoreEngine, CalibrationState, ImageSize};

/// Raw detector confidence below which a candidate is discarded silently.
///
/// This is the low-level gate on the detector's own output, distinct from
/// the engine's `min_confidence` acceptance gate.
pub const MIN_DETECTION_CONFIDENCE: f64 = 0.6;

/// A candidate dart tip reported by a detector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipDetection {
    /// Pixel position in the frame's coordinate space.
    pub tip: Point2<f64>,
    /// Detector's own confidence, `[0, 1]`.
    pub confidence: f64,
}

/// Capability interface for the external tip/blob detector.
///
/// Returning `None` (no candidate in this frame) is normal operation, not
/// an error; it happens at frame rate while no dart is in flight.
pub trait TipDetector {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Option<TipDetection>;
}

/// Sector/multiplier detail passed to the acceptance sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DartInfo {
    pub sector: Option<u8>,
    pub mult: u32,
}

/// Opaque error from the match-logic side of the acceptance boundary.
pub type AcceptanceError = Box<dyn std::error::Error + Send + Sync>;

/// Acceptance callback into match logic.
///
/// `accept` may block while the caller coordinates a commit (UI
/// confirmation, network round-trip); the frame loop owner must not
/// dispatch the next frame into the same engine meanwhile.
pub trait AcceptanceSink {
    fn accept(&mut self, value: u32, ring: Ring, info: DartInfo) -> Result<(), AcceptanceError>;
}

/// Which branch a frame took, for observability and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Detector produced no candidate.
    NoDetection,
    /// Candidate discarded at the raw-confidence gate.
    LowConfidence,
    /// Tip mapped off the board, to infinity, or below the engine gate.
    Miss,
    /// Sink accepted the dart.
    Accepted,
    /// Sink refused; the refusal was logged and swallowed.
    SinkRejected,
}

/// Run one frame end to end.
///
/// `image_size` is the coordinate space the detector reports tips in; the
/// calibration transform is rescaled to it when it differs from the size
/// at lock time. `theta_deg` optionally carries a dart-shaft orientation
/// hint through to sector assignment.
pub fn run_detection_and_notify<D, S>(
    detector: &mut D,
    frame: &D::Frame,
    calibration: &CalibrationState,
    image_size: ImageSize,
    theta_deg: Option<f64>,
    engine: &mut AutoscoreEngine,
    sink: &mut S,
) -> NotifyOutcome
where
    D: TipDetector,
    S: AcceptanceSink,
{
    let Some(detection) = detector.detect(frame) else {
        return NotifyOutcome::NoDetection;
    };
    if detection.confidence < MIN_DETECTION_CONFIDENCE {
        log::debug!(
            "discarding tip candidate at raw confidence {:.2}",
            detection.confidence
        );
        return NotifyOutcome::LowConfidence;
    }

    let h = calibration.homography_for(image_size);
    let result = engine.score_tip(&h, detection.tip, theta_deg);
    if result.score.ring == Ring::Miss || result.confidence < engine.params().min_confidence {
        log::debug!(
            "not notifying: ring {} at confidence {:.2}",
            result.score.ring,
            result.confidence
        );
        return NotifyOutcome::Miss;
    }

    let info = DartInfo {
        sector: result.score.sector,
        mult: result.score.mult,
    };
    match sink.accept(result.score.value(), result.score.ring, info) {
        Ok(()) => NotifyOutcome::Accepted,
        Err(err) => {
            log::warn!("acceptance sink rejected the dart: {err}");
            NotifyOutcome::SinkRejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutoscoreParams;
    use dartscore_core::Homography;

    /// Plays back a scripted sequence of detections.
    struct ScriptedDetector {
        script: Vec<Option<TipDetection>>,
        cursor: usize,
    }

    impl ScriptedDetector {
        fn new(script: Vec<Option<TipDetection>>) -> Self {
            Self { script, cursor: 0 }
        }
    }

    impl TipDetector for ScriptedDetector {
        type Frame = ();

        fn detect(&mut self, _frame: &()) -> Option<TipDetection> {
            let out = self.script.get(self.cursor).copied().flatten();
            self.cursor += 1;
            out
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        darts: Vec<(u32, Ring, DartInfo)>,
        reject: bool,
    }

    impl AcceptanceSink for RecordingSink {
        fn accept(&mut self, value: u32, ring: Ring, info: DartInfo) -> Result<(), AcceptanceError> {
            if self.reject {
                return Err("commit refused".into());
            }
            self.darts.push((value, ring, info));
            Ok(())
        }
    }

    fn calibration() -> CalibrationState {
        // board coordinates equal pixel coordinates
        CalibrationState::new(Homography::identity(), ImageSize::new(640, 480), "cam0")
            .lock(None)
    }

    fn engine() -> AutoscoreEngine {
        AutoscoreEngine::new(AutoscoreParams::default())
    }

    fn tip(x: f64, y: f64, confidence: f64) -> Option<TipDetection> {
        Some(TipDetection {
            tip: Point2::new(x, y),
            confidence,
        })
    }

    #[test]
    fn no_detection_is_a_quiet_no_op() {
        let mut detector = ScriptedDetector::new(vec![None]);
        let mut sink = RecordingSink::default();
        let outcome = run_detection_and_notify(
            &mut detector,
            &(),
            &calibration(),
            ImageSize::new(640, 480),
            None,
            &mut engine(),
            &mut sink,
        );
        assert_eq!(outcome, NotifyOutcome::NoDetection);
        assert!(sink.darts.is_empty());
    }

    #[test]
    fn low_raw_confidence_is_discarded_before_scoring() {
        let mut detector = ScriptedDetector::new(vec![tip(0.0, 103.0, 0.59)]);
        let mut sink = RecordingSink::default();
        let mut eng = engine();
        let outcome = run_detection_and_notify(
            &mut detector,
            &(),
            &calibration(),
            ImageSize::new(640, 480),
            None,
            &mut eng,
            &mut sink,
        );
        assert_eq!(outcome, NotifyOutcome::LowConfidence);
        // engine state untouched: the candidate never reached it
        assert_eq!(eng.stable_count(), 0);
        assert!(sink.darts.is_empty());
    }

    #[test]
    fn a_triple_twenty_reaches_the_sink() {
        let mut detector = ScriptedDetector::new(vec![tip(0.0, 103.0, 0.95)]);
        let mut sink = RecordingSink::default();
        let outcome = run_detection_and_notify(
            &mut detector,
            &(),
            &calibration(),
            ImageSize::new(640, 480),
            None,
            &mut engine(),
            &mut sink,
        );
        assert_eq!(outcome, NotifyOutcome::Accepted);
        assert_eq!(
            sink.darts,
            vec![(
                60,
                Ring::Triple,
                DartInfo {
                    sector: Some(20),
                    mult: 3
                }
            )]
        );
    }

    #[test]
    fn off_board_tips_never_reach_the_sink() {
        let mut detector = ScriptedDetector::new(vec![tip(400.0, 0.0, 0.95)]);
        let mut sink = RecordingSink::default();
        let outcome = run_detection_and_notify(
            &mut detector,
            &(),
            &calibration(),
            ImageSize::new(640, 480),
            None,
            &mut engine(),
            &mut sink,
        );
        assert_eq!(outcome, NotifyOutcome::Miss);
        assert!(sink.darts.is_empty());
    }

    #[test]
    fn sink_rejection_is_swallowed() {
        let mut detector = ScriptedDetector::new(vec![tip(0.0, 103.0, 0.95)]);
        let mut sink = RecordingSink {
            reject: true,
            ..RecordingSink::default()
        };
        let outcome = run_detection_and_notify(
            &mut detector,
            &(),
            &calibration(),
            ImageSize::new(640, 480),
            None,
            &mut engine(),
            &mut sink,
        );
        assert_eq!(outcome, NotifyOutcome::SinkRejected);
        assert!(sink.darts.is_empty());
    }

    #[test]
    fn theta_hint_reaches_sector_assignment() {
        let mut detector = ScriptedDetector::new(vec![tip(0.0, 103.0, 0.95)]);
        let mut sink = RecordingSink::default();
        let outcome = run_detection_and_notify(
            &mut detector,
            &(),
            &calibration(),
            ImageSize::new(640, 480),
            Some(18.0),
            &mut engine(),
            &mut sink,
        );
        assert_eq!(outcome, NotifyOutcome::Accepted);
        assert_eq!(sink.darts[0].0, 39);
        assert_eq!(sink.darts[0].2.sector, Some(13));
    }
}
