//! Projective geometry core for camera-to-dartboard mapping.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about dartboard scoring rules or tip detectors; it only estimates and
//! applies the pixel-to-board perspective transform.

mod homography;
mod logger;

pub use homography::{
    estimate_homography, image_to_board, rms_error, Correspondence, Homography, HomographyError,
};
pub use logger::init_with_level;
