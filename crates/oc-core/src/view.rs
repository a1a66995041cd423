//! View transform: pan origin and magnification.
//!
//! Logical space is Y-up, screen space is Y-down. A logical point `p`
//! lands on screen at `origin + (p.x * m, -p.y * m)` relative to the
//! canvas' top-left corner, where `m` is the magnification.

use kurbo::{Point, Vec2};

pub const MIN_MAGNIFICATION: f64 = 0.05;
pub const MAX_MAGNIFICATION: f64 = 200.0;

pub fn clamp_magnification(magnification: f64) -> f64 {
    magnification.clamp(MIN_MAGNIFICATION, MAX_MAGNIFICATION)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    origin: Point,
    magnification: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(Point::ZERO, 1.0)
    }
}

impl ViewTransform {
    /// A non-finite magnification falls back to 1.
    pub fn new(origin: Point, magnification: f64) -> Self {
        let magnification = if magnification.is_finite() {
            clamp_magnification(magnification)
        } else {
            1.0
        };
        Self {
            origin,
            magnification,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Always within `[MIN_MAGNIFICATION, MAX_MAGNIFICATION]`.
    pub fn magnification(&self) -> f64 {
        self.magnification
    }

    /// Map a screen point (page coordinates) into logical space.
    ///
    /// `canvas_offset` is the canvas' top-left corner in the same page
    /// coordinates.
    pub fn screen_to_logical(&self, screen: Point, canvas_offset: Vec2) -> Point {
        Point::new(
            (screen.x - canvas_offset.x - self.origin.x) / self.magnification,
            (screen.y - canvas_offset.y - self.origin.y) / -self.magnification,
        )
    }

    /// Inverse of [`screen_to_logical`](Self::screen_to_logical).
    pub fn logical_to_screen(&self, logical: Point, canvas_offset: Vec2) -> Point {
        Point::new(
            logical.x * self.magnification + self.origin.x + canvas_offset.x,
            logical.y * -self.magnification + self.origin.y + canvas_offset.y,
        )
    }

    /// Zoom by `zoom_factor` keeping the point under `pivot` in place.
    ///
    /// The origin is shifted with the requested factor even when the
    /// magnification saturates at a limit. Callers that repeat zooms
    /// (pinch gestures) must derive the factor from the actual current
    /// magnification. Non-finite factors are ignored.
    pub fn apply_zoom(&mut self, pivot: Point, canvas_offset: Vec2, zoom_factor: f64) {
        if !zoom_factor.is_finite() {
            log::warn!("ignoring non-finite zoom factor {zoom_factor}");
            return;
        }
        let center = self.screen_to_logical(pivot, canvas_offset);
        let prev_magnification = self.magnification;

        self.magnification = clamp_magnification(self.magnification * zoom_factor);

        self.origin.x += (1.0 - zoom_factor) * center.x * prev_magnification;
        self.origin.y -= (1.0 - zoom_factor) * center.y * prev_magnification;
        log::debug!(
            "zoom x{zoom_factor:.4} about ({:.1}, {:.1}): magnification {prev_magnification:.4} -> {:.4}",
            center.x,
            center.y,
            self.magnification
        );
    }

    /// Pan by a screen-pixel delta. Content moves opposite to the delta.
    pub fn apply_pan(&mut self, delta: Vec2) {
        self.origin -= delta;
    }
}
