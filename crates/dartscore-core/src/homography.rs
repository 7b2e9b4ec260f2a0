use nalgebra::{DMatrix, Matrix3, Point2, Vector3};
use serde::{Deserialize, Serialize};

/// Smallest `|w|` accepted by the projective divide. Below this the point
/// maps to infinity and the transform reports no result.
const W_EPS: f64 = 1e-9;

/// Relative singular-value threshold for declaring the DLT system
/// rank-deficient (three-plus collinear points, repeated points).
const RANK_EPS: f64 = 1e-10;

/// A pixel-to-board perspective transform, defined up to scale.
///
/// By convention `h[(2,2)]` is normalized to 1 whenever it is non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

/// One calibration observation: a pixel point and the board point it
/// corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    pub pixel: Point2<f64>,
    pub board: Point2<f64>,
}

/// Errors raised by homography estimation.
///
/// These are fatal to the calibration attempt and surfaced to the caller;
/// per-point non-results on the scoring path are `Option`s instead.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomographyError {
    #[error("need at least 4 correspondences, got {got}")]
    TooFewPoints { got: usize },
    #[error("degenerate correspondence geometry (collinear or repeated points)")]
    DegenerateGeometry,
    #[error("estimated homography is not invertible")]
    Singular,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Apply the transform with the projective divide.
    ///
    /// Returns `None` when the point maps to infinity (`|w| < W_EPS`). On
    /// the scoring path that is treated as a miss, never as a failure.
    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Option<Point2<f64>> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        let w = v[2];
        if w.abs() < W_EPS {
            return None;
        }
        Some(Point2::new(v[0] / w, v[1] / w))
    }

    /// Compose a pixel-space pre-scale into the transform.
    ///
    /// `self.scaled(sx, sy).apply(p)` equals `self.apply((p.x * sx, p.y * sy))`,
    /// which is what makes rescaling a camera overlay safe without
    /// re-estimating the calibration.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let s = Matrix3::new(
            sx, 0.0, 0.0, //
            0.0, sy, 0.0, //
            0.0, 0.0, 1.0,
        );
        Self::new(self.h * s)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_points(pts: &[Point2<f64>]) -> (Vec<Point2<f64>>, Matrix3<f64>) {
    // Hartley normalization: translate to centroid, scale so mean distance = sqrt(2)
    let n = pts.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in pts {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in pts {
        let dx = p.x - cx;
        let dy = p.y - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    let t = hartley_normalization(cx, cy, mean_dist);

    let mut out = Vec::with_capacity(pts.len());
    for p in pts {
        let v = t * Vector3::new(p.x, p.y, 1.0);
        out.push(Point2::new(v[0], v[1]));
    }
    (out, t)
}

fn normalize_scale(h: Matrix3<f64>) -> Matrix3<f64> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        h
    } else {
        h / s
    }
}

/// Estimate H such that `board ~ H * pixel` from `>= 4` correspondences.
///
/// Direct Linear Transform with Hartley normalization: build the 2n x 9
/// homogeneous system, take the right singular vector for the smallest
/// singular value, denormalize, and fix `h33 = 1`.
pub fn estimate_homography(correspondences: &[Correspondence]) -> Result<Homography, HomographyError> {
    let n = correspondences.len();
    if n < 4 {
        return Err(HomographyError::TooFewPoints { got: n });
    }

    let pixels: Vec<Point2<f64>> = correspondences.iter().map(|c| c.pixel).collect();
    let boards: Vec<Point2<f64>> = correspondences.iter().map(|c| c.board).collect();

    let (src, t_src) = normalize_points(&pixels);
    let (dst, t_dst) = normalize_points(&boards);

    // Pad to at least 9 rows (a zero row is inert) so the thin SVD carries
    // all nine right singular vectors, including the null-space solution
    // in the minimal 4-point case.
    let mut a = DMatrix::<f64>::zeros((2 * n).max(9), 9);
    for k in 0..n {
        let x = src[k].x;
        let y = src[k].y;
        let u = dst[k].x;
        let v = dst[k].y;

        // [ -x -y -1   0  0  0   u*x u*y u ]
        a[(2 * k, 0)] = -x;
        a[(2 * k, 1)] = -y;
        a[(2 * k, 2)] = -1.0;
        a[(2 * k, 6)] = u * x;
        a[(2 * k, 7)] = u * y;
        a[(2 * k, 8)] = u;

        // [ 0  0  0  -x -y -1   v*x v*y v ]
        a[(2 * k + 1, 3)] = -x;
        a[(2 * k + 1, 4)] = -y;
        a[(2 * k + 1, 5)] = -1.0;
        a[(2 * k + 1, 6)] = v * x;
        a[(2 * k + 1, 7)] = v * y;
        a[(2 * k + 1, 8)] = v;
    }

    // Solve Ah = 0 -> h is the right singular vector with smallest singular value
    let svd = a.svd(true, true);
    let sv = &svd.singular_values;
    let vt = svd.v_t.ok_or(HomographyError::DegenerateGeometry)?;

    // A unique (up to scale) solution needs rank 8. Collinear or repeated
    // points leave two vanishing singular values.
    let largest = sv[0];
    let second_smallest = sv[sv.len() - 2];
    if second_smallest <= RANK_EPS * largest.max(1.0) {
        return Err(HomographyError::DegenerateGeometry);
    }

    let last = vt.nrows() - 1;
    let h = vt.row(last); // last row of V^T = last column of V
    let hn =
        Matrix3::<f64>::from_row_slice(&[h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]]);

    // Denormalize: H = T_dst^{-1} * Hn * T_src
    let t_dst_inv = t_dst
        .try_inverse()
        .ok_or(HomographyError::DegenerateGeometry)?;
    let h_full = normalize_scale(t_dst_inv * hn * t_src);

    let out = Homography::new(h_full);
    if out.inverse().is_none() {
        return Err(HomographyError::Singular);
    }
    Ok(out)
}

/// RMS calibration residual in pixels.
///
/// Each correspondence's board point is mapped back to pixel space through
/// `H^-1` and compared against the observed pixel point. Presented to the
/// operator as the calibration quality figure.
pub fn rms_error(
    correspondences: &[Correspondence],
    h: &Homography,
) -> Result<f64, HomographyError> {
    let inv = h.inverse().ok_or(HomographyError::Singular)?;

    let mut sum_sq = 0.0;
    for c in correspondences {
        let predicted = inv.apply(c.board).ok_or(HomographyError::Singular)?;
        let dx = predicted.x - c.pixel.x;
        let dy = predicted.y - c.pixel.y;
        sum_sq += dx * dx + dy * dy;
    }

    let n = correspondences.len().max(1) as f64;
    Ok((sum_sq / n).sqrt())
}

/// Map a camera pixel point into board coordinates.
///
/// `None` means the point projects to infinity; callers treat it as a miss.
#[inline]
pub fn image_to_board(h: &Homography, pixel: Point2<f64>) -> Option<Point2<f64>> {
    h.apply(pixel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_close(a: Point2<f64>, b: Point2<f64>, tol: f64) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    fn ground_truth() -> Homography {
        Homography::from_array([
            [0.8, 0.05, -120.0],
            [-0.02, -0.85, 150.0],
            [0.0004, -0.0002, 1.0],
        ])
    }

    fn synthetic_correspondences(pixels: &[Point2<f64>]) -> Vec<Correspondence> {
        let h = ground_truth();
        pixels
            .iter()
            .map(|&p| Correspondence {
                pixel: p,
                board: h.apply(p).expect("finite"),
            })
            .collect()
    }

    #[test]
    fn dlt_round_trips_training_points() {
        let pixels: Vec<Point2<f64>> = (0..3)
            .flat_map(|j| (0..3).map(move |i| Point2::new(80.0 + i as f64 * 170.0, 60.0 + j as f64 * 140.0)))
            .collect();
        let corr = synthetic_correspondences(&pixels);

        let h = estimate_homography(&corr).expect("estimate");
        for c in &corr {
            let mapped = h.apply(c.pixel).expect("finite");
            assert_close(mapped, c.board, 1e-6);
        }
    }

    #[test]
    fn rms_error_is_zero_on_exact_data() {
        let pixels = [
            Point2::new(100.0, 100.0),
            Point2::new(540.0, 90.0),
            Point2::new(560.0, 420.0),
            Point2::new(90.0, 440.0),
            Point2::new(320.0, 260.0),
        ];
        let corr = synthetic_correspondences(&pixels);
        let h = estimate_homography(&corr).expect("estimate");
        let rms = rms_error(&corr, &h).expect("rms");
        assert!(rms < 1e-6, "rms = {rms}");
    }

    #[test]
    fn too_few_points_fail() {
        let corr = synthetic_correspondences(&[
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
        ]);
        assert_eq!(
            estimate_homography(&corr),
            Err(HomographyError::TooFewPoints { got: 3 })
        );
    }

    #[test]
    fn collinear_points_are_degenerate() {
        // all four pixels on one line
        let pixels = [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, 50.0),
            Point2::new(100.0, 100.0),
            Point2::new(150.0, 150.0),
        ];
        let corr = synthetic_correspondences(&pixels);
        assert_eq!(
            estimate_homography(&corr),
            Err(HomographyError::DegenerateGeometry)
        );
    }

    #[test]
    fn scaled_matches_prescaled_points() {
        let h = ground_truth();
        let (sx, sy) = (1280.0 / 640.0, 720.0 / 480.0);
        let scaled = h.scaled(sx, sy);

        for p in [
            Point2::new(10.0, 20.0),
            Point2::new(300.0, 200.0),
            Point2::new(615.0, 470.0),
        ] {
            let a = scaled.apply(p).expect("finite");
            let b = h.apply(Point2::new(p.x * sx, p.y * sy)).expect("finite");
            assert_relative_eq!(a.x, b.x, max_relative = 1e-12);
            assert_relative_eq!(a.y, b.y, max_relative = 1e-12);
        }
    }

    #[test]
    fn point_at_infinity_maps_to_none() {
        // w = 0.01 * y - 1 vanishes along y = 100
        let h = Homography::from_array([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.01, -1.0],
        ]);
        assert!(h.apply(Point2::new(42.0, 100.0)).is_none());
        assert!(h.apply(Point2::new(42.0, 50.0)).is_some());
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = ground_truth();
        let inv = h.inverse().expect("invertible");
        for p in [
            Point2::new(0.0, 0.0),
            Point2::new(50.0, -20.0),
            Point2::new(320.0, 200.0),
        ] {
            let q = h.apply(p).expect("finite");
            let back = inv.apply(q).expect("finite");
            assert_close(back, p, 1e-9);
        }
    }
}
