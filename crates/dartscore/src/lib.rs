//! High-level facade crate for the `dartscore-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the geometry, board-model and marker crates
//! - [`CalibrationState`]: the locked pixel-to-board transform plus the
//!   image/overlay sizes it was locked at
//! - [`AutoscoreEngine`]: per-session tip stability tracking and
//!   confidence scoring
//! - [`notify::run_detection_and_notify`]: one-frame orchestration from a
//!   tip detector to the match-logic acceptance sink
//!
//! ## Quickstart
//!
//! ```
//! use dartscore::core::{estimate_homography, Correspondence};
//! use dartscore::marker::anchor_correspondences;
//! use dartscore::{AutoscoreEngine, AutoscoreParams};
//! use nalgebra::Point2;
//!
//! // correspondences usually come from detected calibration markers
//! let corr: Vec<Correspondence> = anchor_correspondences(&[
//!     (0, Point2::new(100.0, 80.0)),
//!     (2, Point2::new(540.0, 80.0)),
//!     (4, Point2::new(540.0, 520.0)),
//!     (6, Point2::new(100.0, 520.0)),
//! ]);
//! let h = estimate_homography(&corr).expect("well-conditioned markers");
//!
//! let mut engine = AutoscoreEngine::new(AutoscoreParams::default());
//! let result = engine.score_tip(&h, Point2::new(320.0, 196.0), None);
//! println!("{} ({:.2})", result.score.ring, result.confidence);
//! ```
//!
//! ## API map
//! - `dartscore::core`: homography estimation and application.
//! - `dartscore::board`: radii, sector order, score resolution.
//! - `dartscore::marker`: calibration fiducial encoding and anchors.
//! - `dartscore::notify`: detector/acceptance seams and the frame loop entry.

pub use dartscore_board as board;
pub use dartscore_core as core;
pub use dartscore_marker as marker;

mod autoscore;
mod calibration;
pub mod notify;

pub use autoscore::{
    score_from_image_point, AutoscoreEngine, AutoscoreParams, AutoscoreResult, TipTrack,
};
pub use calibration::{CalibrationState, ImageSize};
pub use dartscore_board::{score_at_point, score_at_point_theta, Ring, Score};
pub use dartscore_core::{
    estimate_homography, image_to_board, rms_error, Correspondence, Homography, HomographyError,
};
