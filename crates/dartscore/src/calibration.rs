use dartscore_core::Homography;
use serde::{Deserialize, Serialize};

/// A render or capture size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub w: u32,
    pub h: u32,
}

impl ImageSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// The output of a completed calibration session.
///
/// Created and replaced (whole, never mutated in place) by the external
/// calibration workflow; the scoring path only reads it. `overlay_size`
/// preserves the rendering size seen when the calibration locked, so a
/// later rescale of the camera overlay reduces to a pre-scale of `h`
/// instead of a re-estimation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    /// Pixel-to-board transform, pixel coordinates in `image_size` space.
    pub h: Homography,
    /// Capture size the correspondences were sampled at.
    pub image_size: ImageSize,
    /// Overlay render size at lock time, if the UI reported one.
    pub overlay_size: Option<ImageSize>,
    pub locked: bool,
    pub camera_id: String,
}

impl CalibrationState {
    pub fn new(h: Homography, image_size: ImageSize, camera_id: impl Into<String>) -> Self {
        Self {
            h,
            image_size,
            overlay_size: None,
            locked: false,
            camera_id: camera_id.into(),
        }
    }

    /// Mark the calibration locked, remembering the overlay render size.
    pub fn lock(mut self, overlay_size: Option<ImageSize>) -> Self {
        self.overlay_size = overlay_size;
        self.locked = true;
        self
    }

    /// Pixel space `h` expects its input in: the overlay size at lock time
    /// when one was recorded, the capture size otherwise.
    pub fn reference_size(&self) -> ImageSize {
        self.overlay_size.unwrap_or(self.image_size)
    }

    /// Homography valid for pixel coordinates sampled at `current` size.
    ///
    /// Identity pass-through when sizes match; otherwise the current
    /// coordinates are pre-scaled into the reference space, which is
    /// equivalent to scaling the sampled points (see
    /// `Homography::scaled`).
    pub fn homography_for(&self, current: ImageSize) -> Homography {
        let reference = self.reference_size();
        if current == reference {
            return self.h;
        }
        let sx = f64::from(reference.w) / f64::from(current.w.max(1));
        let sy = f64::from(reference.h) / f64::from(current.h.max(1));
        self.h.scaled(sx, sy)
    }
}
