//! Deterministic id-to-bitmap encoding.
//!
//! Bit convention: a cell holds the raw bit value, `0` printing as black.
//! The border ring (row/col 0 and 6) is always `0`, giving the detector a
//! solid black frame to lock onto. The inner 5x5 payload carries the id
//! row-major, least significant bit first: `bit = row * 5 + col`.

/// Marker side length in cells, border included.
pub const MARKER_GRID: usize = 7;
/// Payload capacity of the inner 5x5 grid.
pub const PAYLOAD_BITS: u32 = 25;
/// Exclusive upper bound of the encodable id range.
pub const MARKER_ID_LIMIT: u32 = 1 << PAYLOAD_BITS;

/// A marker bitmap, row-major, each cell `0` or `1`.
pub type MarkerMatrix = [[u8; MARKER_GRID]; MARKER_GRID];

/// Encode `id` into its printable 7x7 bit matrix.
///
/// # Panics
///
/// An out-of-range id is a programmer error and fails fast.
pub fn marker_id_to_matrix(id: u32) -> MarkerMatrix {
    assert!(
        id < MARKER_ID_LIMIT,
        "marker id {id} out of range (limit {MARKER_ID_LIMIT})"
    );

    let mut m: MarkerMatrix = [[0; MARKER_GRID]; MARKER_GRID];
    for row in 0..5 {
        for col in 0..5 {
            let bit = (row * 5 + col) as u32;
            m[row + 1][col + 1] = ((id >> bit) & 1) as u8;
        }
    }
    m
}

/// Recover the id from a marker bitmap.
///
/// Returns `None` unless the border ring is all zero and every cell is a
/// clean `0`/`1` — anything else is not one of our markers.
pub fn decode_marker_matrix(m: &MarkerMatrix) -> Option<u32> {
    for row in 0..MARKER_GRID {
        for col in 0..MARKER_GRID {
            let v = m[row][col];
            if v > 1 {
                return None;
            }
            let is_border =
                row == 0 || col == 0 || row + 1 == MARKER_GRID || col + 1 == MARKER_GRID;
            if is_border && v != 0 {
                return None;
            }
        }
    }

    let mut id = 0u32;
    for row in 0..5 {
        for col in 0..5 {
            let bit = (row * 5 + col) as u32;
            id |= u32::from(m[row + 1][col + 1]) << bit;
        }
    }
    Some(id)
}
