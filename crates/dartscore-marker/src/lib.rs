//! Calibration fiducial markers.
//!
//! Each printable marker is a 7x7 bit matrix with a black border ring and a
//! 25-bit payload carrying its id. A marker id also names one fixed
//! board-space anchor point, so a detected marker center immediately yields
//! one `(pixel, board)` correspondence for homography estimation.
//!
//! Marker *detection* in camera frames is an external collaborator; this
//! crate only owns the deterministic id-to-bitmap contract and the anchor
//! table.

mod anchors;
mod encode;

pub use anchors::{anchor_correspondences, anchor_point, ANCHORS, ANCHOR_COUNT};
pub use encode::{
    decode_marker_matrix, marker_id_to_matrix, MarkerMatrix, MARKER_GRID, MARKER_ID_LIMIT,
    PAYLOAD_BITS,
};
