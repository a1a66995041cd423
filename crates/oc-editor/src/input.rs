//! Input abstraction layer.
//!
//! Normalizes the browser's mouse, wheel and Safari pinch events into a
//! unified `InputEvent` enum consumed by the canvas controller. All
//! positions are page coordinates in CSS pixels.

use kurbo::{Point, Vec2};

/// Phase of a platform pinch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Change,
    End,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer moved over the canvas.
    PointerMove { x: f64, y: f64 },

    /// Wheel or trackpad scroll.
    Wheel {
        x: f64,
        y: f64,
        delta_x: f64,
        delta_y: f64,
        /// Ctrl held, or a trackpad pinch the browser reports as ctrl+wheel.
        zoom_modifier: bool,
    },

    /// Pinch gesture. `scale` is cumulative since the gesture started.
    Gesture {
        phase: GesturePhase,
        scale: f64,
        x: f64,
        y: f64,
    },

    /// The window (and so the canvas' parent) changed size.
    Resize,
}

impl InputEvent {
    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn wheel(x: f64, y: f64, delta_x: f64, delta_y: f64, zoom_modifier: bool) -> Self {
        Self::Wheel {
            x,
            y,
            delta_x,
            delta_y,
            zoom_modifier,
        }
    }

    pub fn gesture(phase: GesturePhase, scale: f64, x: f64, y: f64) -> Self {
        Self::Gesture { phase, scale, x, y }
    }

    /// Extract the page position, if the event has one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerMove { x, y }
            | Self::Wheel { x, y, .. }
            | Self::Gesture { x, y, .. } => Some(Point::new(*x, *y)),
            Self::Resize => None,
        }
    }

    pub fn wheel_delta(&self) -> Option<Vec2> {
        match self {
            Self::Wheel {
                delta_x, delta_y, ..
            } => Some(Vec2::new(*delta_x, *delta_y)),
            _ => None,
        }
    }

    /// Whether the browser's default action (page scroll, page zoom) must
    /// be suppressed for this event.
    pub fn suppresses_default(&self) -> bool {
        matches!(self, Self::Wheel { .. } | Self::Gesture { .. })
    }
}

/// What handling an event did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    pub redrawn: bool,
    pub prevent_default: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn positions() {
        assert_eq!(
            InputEvent::pointer_move(3.0, 4.0).position(),
            Some(Point::new(3.0, 4.0))
        );
        assert_eq!(InputEvent::Resize.position(), None);
    }

    #[test]
    fn only_wheel_and_gesture_suppress_default() {
        assert!(InputEvent::wheel(0.0, 0.0, 1.0, 1.0, false).suppresses_default());
        assert!(InputEvent::gesture(GesturePhase::End, 1.0, 0.0, 0.0).suppresses_default());
        assert!(!InputEvent::pointer_move(0.0, 0.0).suppresses_default());
        assert!(!InputEvent::Resize.suppresses_default());
    }
}
