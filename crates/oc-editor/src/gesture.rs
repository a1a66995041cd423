//! Wheel and pinch normalization.
//!
//! Turns raw deltas and cumulative pinch scales into the incremental zoom
//! factors and pan offsets the view transform understands.

use kurbo::Vec2;

/// Wheel delta (in pixels) that zooms by 100% with the zoom modifier held.
const WHEEL_ZOOM_DIVISOR: f64 = 100.0;

/// What a wheel event should do to the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    Zoom(f64),
    Pan(Vec2),
}

/// Classify a wheel event.
///
/// With the zoom modifier the vertical delta becomes a zoom factor
/// `1 - dy / 100`. Otherwise only the dominant axis pans, so a slightly
/// diagonal trackpad swipe scrolls straight.
pub fn wheel_action(delta: Vec2, zoom_modifier: bool) -> WheelAction {
    if zoom_modifier {
        WheelAction::Zoom(1.0 - delta.y / WHEEL_ZOOM_DIVISOR)
    } else if delta.x.abs() > delta.y.abs() {
        WheelAction::Pan(Vec2::new(delta.x, 0.0))
    } else {
        WheelAction::Pan(Vec2::new(0.0, delta.y))
    }
}

// ─── Pinch ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum PinchState {
    #[default]
    Idle,
    Pinching { initial_magnification: f64 },
}

/// Converts a pinch's cumulative scale into per-event zoom factors.
///
/// The platform reports `scale` relative to the start of the gesture. Each
/// change is turned into the factor that takes the *current* magnification
/// to `initial * scale`, so rounding and clamping never accumulate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PinchTracker {
    state: PinchState,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self.state, PinchState::Pinching { .. })
    }

    /// Snapshot `current` and return the factor for the start event itself.
    /// A start while already pinching re-snapshots.
    pub fn start(&mut self, current_magnification: f64, scale: f64) -> f64 {
        self.state = PinchState::Pinching {
            initial_magnification: current_magnification,
        };
        scale
    }

    /// Factor for a change event, or `None` without a preceding start.
    pub fn change(&self, current_magnification: f64, scale: f64) -> Option<f64> {
        match self.state {
            PinchState::Pinching {
                initial_magnification,
            } => Some(initial_magnification * scale / current_magnification),
            PinchState::Idle => {
                log::warn!("pinch change without a gesture start; ignoring");
                None
            }
        }
    }

    /// Returns whether a pinch was in progress.
    pub fn end(&mut self) -> bool {
        let was_pinching = self.is_pinching();
        self.state = PinchState::Idle;
        was_pinching
    }
}
