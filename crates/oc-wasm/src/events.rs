//! DOM event → `InputEvent` normalization.

use oc_editor::{GesturePhase, InputEvent};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, MouseEvent, WheelEvent};

pub fn pointer_move(event: &Event) -> Option<InputEvent> {
    let e = event.dyn_ref::<MouseEvent>()?;
    Some(InputEvent::pointer_move(
        f64::from(e.page_x()),
        f64::from(e.page_y()),
    ))
}

pub fn wheel(event: &Event) -> Option<InputEvent> {
    let e = event.dyn_ref::<WheelEvent>()?;
    Some(InputEvent::wheel(
        f64::from(e.page_x()),
        f64::from(e.page_y()),
        e.delta_x(),
        e.delta_y(),
        e.ctrl_key(),
    ))
}

/// Safari's `GestureEvent` has no web-sys binding; its fields are read
/// reflectively.
pub fn gesture(event: &Event, phase: GesturePhase) -> Option<InputEvent> {
    let scale = number_field(event, "scale").unwrap_or(1.0);
    let x = number_field(event, "pageX")?;
    let y = number_field(event, "pageY")?;
    Some(InputEvent::gesture(phase, scale, x, y))
}

pub fn gesture_phase(event_type: &str) -> Option<GesturePhase> {
    match event_type {
        "gesturestart" => Some(GesturePhase::Start),
        "gesturechange" => Some(GesturePhase::Change),
        "gestureend" => Some(GesturePhase::End),
        _ => None,
    }
}

/// Event types whose browser default must always be cancelled.
pub fn suppresses_default(event_type: &str) -> bool {
    event_type == "wheel" || gesture_phase(event_type).is_some()
}

fn number_field(event: &Event, name: &str) -> Option<f64> {
    js_sys::Reflect::get(event, &JsValue::from_str(name))
        .ok()?
        .as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gesture_event_names() {
        assert_eq!(gesture_phase("gesturestart"), Some(GesturePhase::Start));
        assert_eq!(gesture_phase("gesturechange"), Some(GesturePhase::Change));
        assert_eq!(gesture_phase("gestureend"), Some(GesturePhase::End));
        assert_eq!(gesture_phase("wheel"), None);
    }

    #[test]
    fn wheel_and_gestures_always_cancel_native_handling() {
        for event_type in ["wheel", "gesturestart", "gesturechange", "gestureend"] {
            assert!(suppresses_default(event_type), "{event_type}");
        }
        assert!(!suppresses_default("mousemove"));
        assert!(!suppresses_default("resize"));
    }
}
