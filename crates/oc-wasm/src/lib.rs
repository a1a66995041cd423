//! WASM bridge for the outline canvas.
//!
//! Compiled via `wasm-pack build --target web`. The host page constructs an
//! [`OutlineCanvas`] over a `<canvas>` element and a packed path; from then
//! on DOM events drive the controller directly.

mod canvas2d;
mod events;
mod listeners;
mod logger;

use canvas2d::HtmlSurface;
use listeners::{Listener, Subscriptions};
use oc_core::{CanvasError, ControllerConfig, DrawingParameters, OutlinePath, PackedPath};
use oc_editor::{CanvasController, InputEvent, SelectionTransform, TransformOrigin};
use oc_render::{Layer, SharedPath};
use serde::Deserialize;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlCanvasElement, Window};

type Controller = CanvasController<HtmlSurface>;

/// The JS-facing canvas.
///
/// Owns the controller and the DOM listeners feeding it. Listeners are
/// removed on [`dispose`](OutlineCanvas::dispose) or when the wrapper is
/// freed.
#[wasm_bindgen]
pub struct OutlineCanvas {
    controller: Rc<RefCell<Controller>>,
    subscriptions: Subscriptions,
}

#[wasm_bindgen]
impl OutlineCanvas {
    /// `path_json` is a packed path (`coordinates`, `pointTypes`,
    /// `contours`); `params_json` optionally overrides drawing parameters.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        path_json: &str,
        params_json: Option<String>,
    ) -> Result<OutlineCanvas, JsValue> {
        logger::init(log::LevelFilter::Warn);
        logger::console_error_panic_hook_setup();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let path = PackedPath::from_json(path_json).map_err(to_js)?;
        let mut config = ControllerConfig::default();
        if let Some(json) = params_json.as_deref() {
            config.drawing = DrawingParameters::from_json(json).map_err(to_js)?;
        }

        let surface = HtmlSurface::new(canvas.clone(), window.clone())?;
        let shared: SharedPath = Rc::new(RefCell::new(path));
        let controller = CanvasController::new(surface, shared, config).map_err(to_js)?;
        let controller = Rc::new(RefCell::new(controller));
        let subscriptions = subscribe(&window, &canvas, &controller)?;
        log::info!(
            "outline canvas ready ({} listeners)",
            subscriptions.len()
        );

        Ok(Self {
            controller,
            subscriptions,
        })
    }

    pub fn magnification(&self) -> f64 {
        self.controller.borrow().magnification()
    }

    pub fn origin_x(&self) -> f64 {
        self.controller.borrow().origin().x
    }

    pub fn origin_y(&self) -> f64 {
        self.controller.borrow().origin().y
    }

    pub fn frame_count(&self) -> f64 {
        self.controller.borrow().frame_count() as f64
    }

    /// `[x, y]` of the hovered point, if any.
    pub fn hovered_point(&self) -> Option<Vec<f64>> {
        self.controller
            .borrow()
            .hovered_point()
            .map(|p| vec![p.x, p.y])
    }

    /// Snapshot of the flat `[x0, y0, x1, y1, ...]` coordinate buffer.
    pub fn coordinates(&self) -> Vec<f64> {
        self.controller.borrow().path().borrow().coordinates().to_vec()
    }

    pub fn redraw(&self) -> Result<(), JsValue> {
        self.controller_mut()?.draw();
        Ok(())
    }

    pub fn zoom(&self, factor: f64, page_x: f64, page_y: f64) -> Result<(), JsValue> {
        self.controller_mut()?
            .apply_zoom(kurbo::Point::new(page_x, page_y), factor);
        Ok(())
    }

    pub fn pan(&self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.controller_mut()?.apply_pan(kurbo::Vec2::new(dx, dy));
        Ok(())
    }

    pub fn set_point(&self, index: u32, x: f64, y: f64) -> Result<(), JsValue> {
        self.controller_mut()?
            .set_point(index as usize, kurbo::Point::new(x, y))
            .map_err(to_js)
    }

    /// Apply a JSON transform request, e.g.
    /// `{"points":[1,2],"transform":{"kind":"rotate","degrees":90},"origin":{"x":"left","y":"top"}}`.
    /// Returns whether any point moved.
    pub fn transform_points(&self, request_json: &str) -> Result<bool, JsValue> {
        let request = TransformRequest::from_json(request_json).map_err(to_js)?;
        self.controller_mut()?
            .transform_points(&request.points, request.transform, request.origin)
            .map_err(to_js)
    }

    /// Show or hide one of `handles`, `outline`, `nodes`, `hover`.
    pub fn set_layer_visible(&self, name: &str, visible: bool) -> Result<(), JsValue> {
        let layer = Layer::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown layer `{name}`")))?;
        self.controller_mut()?.set_layer_hidden(layer, !visible);
        Ok(())
    }

    /// Unregister every DOM listener. The canvas stays as last drawn.
    pub fn dispose(&mut self) {
        self.subscriptions.clear();
    }
}

impl OutlineCanvas {
    fn controller_mut(&self) -> Result<RefMut<'_, Controller>, JsValue> {
        self.controller
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("canvas is busy handling an event"))
    }
}

/// Set the console log level (`error`, `warn`, `info`, `debug`, `trace`, `off`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::set_level(logger::parse_level(level));
}

// ─── Event wiring ────────────────────────────────────────────────────────

fn subscribe(
    window: &Window,
    canvas: &HtmlCanvasElement,
    controller: &Rc<RefCell<Controller>>,
) -> Result<Subscriptions, JsValue> {
    let mut subscriptions = Subscriptions::default();
    subscriptions.push(Listener::new(
        window,
        "resize",
        None,
        dispatcher(controller, |_| Some(InputEvent::Resize)),
    )?);
    subscriptions.push(Listener::new(
        canvas,
        "mousemove",
        None,
        dispatcher(controller, events::pointer_move),
    )?);
    subscriptions.push(Listener::new(
        canvas,
        "wheel",
        Some(false),
        dispatcher(controller, events::wheel),
    )?);
    for event_type in ["gesturestart", "gesturechange", "gestureend"] {
        subscriptions.push(Listener::new(
            canvas,
            event_type,
            Some(false),
            dispatcher(controller, |event: &Event| {
                events::gesture_phase(&event.type_())
                    .and_then(|phase| events::gesture(event, phase))
            }),
        )?);
    }
    Ok(subscriptions)
}

/// Normalize each DOM event and feed it to the controller.
///
/// Wheel and gesture events have their native handling (page scroll and
/// page zoom) cancelled before anything else, even when the event cannot
/// be read or the controller is busy.
fn dispatcher(
    controller: &Rc<RefCell<Controller>>,
    normalize: fn(&Event) -> Option<InputEvent>,
) -> impl FnMut(Event) + 'static {
    let controller = Rc::clone(controller);
    move |event: Event| {
        let suppressed = events::suppresses_default(&event.type_());
        if suppressed {
            event.prevent_default();
        }
        let Some(input) = normalize(&event) else {
            log::debug!("ignoring unrecognized {} event", event.type_());
            return;
        };
        let Ok(mut controller) = controller.try_borrow_mut() else {
            log::warn!("dropping {} event: controller busy", event.type_());
            return;
        };
        let response = controller.handle_event(&input);
        if response.prevent_default && !suppressed {
            event.prevent_default();
        }
    }
}

// ─── Requests ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
struct TransformRequest {
    points: Vec<usize>,
    transform: SelectionTransform,
    #[serde(default)]
    origin: TransformOrigin,
}

impl TransformRequest {
    fn from_json(json: &str) -> Result<Self, CanvasError> {
        serde_json::from_str(json).map_err(|e| CanvasError::InvalidRequest(e.to_string()))
    }
}

fn to_js(err: CanvasError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}
