//! View transform between device (screen) space and logical drawing space.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower zoom bound.
pub const DEFAULT_MIN_SCALE: f64 = 0.05;
/// Default upper zoom bound.
pub const DEFAULT_MAX_SCALE: f64 = 50.0;

/// The active pan/zoom transform: `device = logical * scale + offset`.
///
/// `scale` is always strictly positive; every mutation goes through
/// [`ViewState::zoom_at`] or [`ViewState::reset`], which keep it inside
/// `[min_scale, max_scale]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Current zoom factor.
    scale: f64,
    /// Translation of the logical origin in device pixels.
    offset: Vec2,
    /// Minimum allowed zoom level.
    min_scale: f64,
    /// Maximum allowed zoom level.
    max_scale: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
        }
    }
}

impl ViewState {
    /// Identity view with the default zoom bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity view with custom zoom bounds.
    ///
    /// Bounds are expected to satisfy `0 < min_scale <= 1 <= max_scale`;
    /// [`crate::BoardConfig::validate`] enforces this for configured views.
    pub fn with_limits(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            ..Self::default()
        }
    }

    /// Build a view from explicit parts, clamping `scale` into the default bounds.
    pub fn from_parts(scale: f64, offset: Vec2) -> Self {
        let mut view = Self::default();
        view.scale = view.clamp_scale(scale);
        view.offset = offset;
        view
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Logical-to-device transform, for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Device-to-logical transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a device point to logical coordinates.
    pub fn to_logical(&self, device: Point) -> Point {
        Point::new(
            (device.x - self.offset.x) / self.scale,
            (device.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a logical point to device coordinates.
    pub fn to_device(&self, logical: Point) -> Point {
        Point::new(
            logical.x * self.scale + self.offset.x,
            logical.y * self.scale + self.offset.y,
        )
    }

    /// Multiply the zoom by `factor`, keeping the logical point under
    /// `device_point` fixed on screen.
    ///
    /// Returns `true` if the view changed.
    pub fn zoom_at(&mut self, device_point: Point, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("Ignoring zoom with invalid factor {factor}");
            return false;
        }

        let new_scale = self.clamp_scale(self.scale * factor);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }

        // Logical point under the anchor, measured with the old view
        let anchor = self.to_logical(device_point);

        self.scale = new_scale;
        self.offset = Vec2::new(
            device_point.x - anchor.x * new_scale,
            device_point.y - anchor.y * new_scale,
        );
        true
    }

    /// Reset to identity (scale 1, no offset).
    pub fn reset(&mut self) {
        self.scale = self.clamp_scale(1.0);
        self.offset = Vec2::ZERO;
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// Zoom factor for one wheel notch: scrolling up (negative `delta_y`) zooms
/// in by `step`, anything else zooms out by `1 / step`.
pub fn wheel_factor(delta_y: f64, step: f64) -> f64 {
    if delta_y < 0.0 { step } else { 1.0 / step }
}
