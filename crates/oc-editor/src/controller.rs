//! The canvas controller.
//!
//! Owns the view transform, the layered scene and the surface. Every
//! handler that changes what is visible redraws synchronously before it
//! returns; there is no frame scheduling.

use crate::gesture::{PinchTracker, WheelAction, wheel_action};
use crate::input::{EventResponse, GesturePhase, InputEvent};
use crate::selection::{SelectionTransform, TransformOrigin};
use crate::surface::Surface;
use kurbo::{Point, Rect, Vec2};
use oc_core::{CanvasError, ControllerConfig, DrawingParameters, OutlinePath, PathPoint, ViewTransform};
use oc_render::{
    Composite, DrawContext, HoverHighlight, Layer, RenderContext, SavedState, SceneItem,
    SceneItemKind, SharedPath, hit_test_point,
};

pub struct CanvasController<S: Surface> {
    surface: S,
    path: SharedPath,
    /// Root composite; children are indexed by `Layer` position in `Layer::ALL`.
    scene: SceneItem,
    view: ViewTransform,
    params: DrawingParameters,
    pinch: PinchTracker,
    frames: u64,
}

impl<S: Surface> CanvasController<S> {
    /// Build the layered scene for `path`, size the surface and draw the
    /// first frame.
    pub fn new(surface: S, path: SharedPath, config: ControllerConfig) -> Result<Self, CanvasError> {
        config.drawing.validate()?;

        let mut layers = Composite::new();
        for layer in Layer::ALL {
            let kind = match layer {
                Layer::Handles => SceneItemKind::Handles(path.clone()),
                Layer::Outline => SceneItemKind::Outline(path.clone()),
                Layer::Nodes => SceneItemKind::Nodes(path.clone()),
                Layer::Hover => SceneItemKind::Hover(HoverHighlight::default()),
            };
            layers.push(SceneItem::new(kind));
        }

        let mut controller = Self {
            surface,
            path,
            scene: SceneItem::new(SceneItemKind::Composite(layers)),
            view: ViewTransform::new(config.origin, config.magnification),
            params: config.drawing,
            pinch: PinchTracker::new(),
            frames: 0,
        };
        controller.setup_size();
        controller.draw();
        Ok(controller)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn path(&self) -> &SharedPath {
        &self.path
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn magnification(&self) -> f64 {
        self.view.magnification()
    }

    pub fn origin(&self) -> Point {
        self.view.origin()
    }

    pub fn drawing_parameters(&self) -> &DrawingParameters {
        &self.params
    }

    /// Frames drawn since construction.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn hovered_point(&self) -> Option<PathPoint> {
        self.layer(Layer::Hover)
            .and_then(SceneItem::as_hover)
            .and_then(|h| h.point().copied())
    }

    pub fn is_layer_hidden(&self, layer: Layer) -> bool {
        self.layer(layer).is_some_and(|item| item.hidden)
    }

    fn layer(&self, layer: Layer) -> Option<&SceneItem> {
        match self.scene.kind() {
            SceneItemKind::Composite(c) => c.get(layer_index(layer)),
            _ => None,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> Option<&mut SceneItem> {
        self.scene
            .as_composite_mut()
            .and_then(|c| c.get_mut(layer_index(layer)))
    }

    // ─── Coordinates ─────────────────────────────────────────────────────

    pub fn screen_to_logical(&self, screen: Point) -> Point {
        self.view
            .screen_to_logical(screen, self.surface.canvas_offset())
    }

    pub fn logical_to_screen(&self, logical: Point) -> Point {
        self.view
            .logical_to_screen(logical, self.surface.canvas_offset())
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Size the backing store to the parent's layout times the device pixel
    /// ratio, rounded down. Repeating with unchanged inputs changes nothing.
    fn setup_size(&mut self) {
        let layout = self.surface.layout_size();
        let dpr = device_pixel_ratio(&self.surface);
        let width = (layout.width * dpr).floor().max(0.0) as u32;
        let height = (layout.height * dpr).floor().max(0.0) as u32;
        log::debug!(
            "canvas size {}x{} css px @{dpr} -> {width}x{height}",
            layout.width,
            layout.height
        );
        self.surface.set_backing_size(width, height, layout);
    }

    /// Clear and repaint the whole scene.
    pub fn draw(&mut self) {
        let (width, height) = self.surface.backing_size();
        let dpr = device_pixel_ratio(&self.surface);
        let magnification = self.view.magnification();
        let origin = self.view.origin();
        log::trace!("PAINT frame {} @{magnification:.4}", self.frames + 1);

        let ctx: &dyn DrawContext = self.surface.context();
        ctx.clear_rect(Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));
        {
            let saved = SavedState::new(ctx);
            saved.scale(dpr, dpr);
            saved.translate(origin.x, origin.y);
            saved.scale(magnification, -magnification);

            let rc = RenderContext {
                ctx,
                magnification,
                params: &self.params,
            };
            self.scene.draw(&rc);
        }
        self.frames += 1;
    }

    // ─── Event handlers ──────────────────────────────────────────────────

    /// Dispatch a normalized event.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventResponse {
        let redrawn = match *event {
            InputEvent::PointerMove { x, y } => self.handle_pointer_move(Point::new(x, y)),
            InputEvent::Wheel {
                x,
                y,
                delta_x,
                delta_y,
                zoom_modifier,
            } => {
                self.handle_wheel(Point::new(x, y), Vec2::new(delta_x, delta_y), zoom_modifier);
                true
            }
            InputEvent::Gesture { phase, scale, x, y } => {
                let pivot = Point::new(x, y);
                match phase {
                    GesturePhase::Start => {
                        self.handle_gesture_start(pivot, scale);
                        true
                    }
                    GesturePhase::Change => self.handle_gesture_change(pivot, scale),
                    GesturePhase::End => {
                        self.handle_gesture_end();
                        false
                    }
                }
            }
            InputEvent::Resize => {
                self.handle_resize();
                true
            }
        };
        EventResponse {
            redrawn,
            prevent_default: event.suppresses_default(),
        }
    }

    pub fn handle_resize(&mut self) {
        self.setup_size();
        self.draw();
    }

    /// Update the hover highlight for a pointer at `page`. Redraws and
    /// returns `true` only when the hovered point changed.
    pub fn handle_pointer_move(&mut self, page: Point) -> bool {
        let logical = self.screen_to_logical(page);
        let side = self.params.node_size / self.view.magnification();
        let hit = match self.path.try_borrow() {
            Ok(path) => hit_test_point(&*path, logical, side),
            Err(_) => {
                log::warn!("path is being edited; skipping hover test");
                return false;
            }
        };

        let changed = self
            .layer_mut(Layer::Hover)
            .and_then(SceneItem::as_hover_mut)
            .is_some_and(|hover| hover.set(hit));
        if changed {
            log::debug!(
                "hover -> {:?}",
                hit.map(|p| (p.x, p.y, p.point_type))
            );
            self.draw();
        }
        changed
    }

    pub fn handle_wheel(&mut self, page: Point, delta: Vec2, zoom_modifier: bool) {
        match wheel_action(delta, zoom_modifier) {
            WheelAction::Zoom(factor) => self.apply_zoom(page, factor),
            WheelAction::Pan(delta) => self.apply_pan(delta),
        }
    }

    pub fn handle_gesture_start(&mut self, pivot: Point, scale: f64) {
        let factor = self.pinch.start(self.view.magnification(), scale);
        self.apply_zoom(pivot, factor);
    }

    /// Returns whether the view changed (a change outside a gesture is
    /// ignored).
    pub fn handle_gesture_change(&mut self, pivot: Point, scale: f64) -> bool {
        match self.pinch.change(self.view.magnification(), scale) {
            Some(factor) => {
                self.apply_zoom(pivot, factor);
                true
            }
            None => false,
        }
    }

    pub fn handle_gesture_end(&mut self) {
        self.pinch.end();
    }

    // ─── View and content mutation ───────────────────────────────────────

    /// Zoom about the page point `pivot` and redraw.
    pub fn apply_zoom(&mut self, pivot: Point, factor: f64) {
        let offset = self.surface.canvas_offset();
        self.view.apply_zoom(pivot, offset, factor);
        self.draw();
    }

    /// Pan by a screen-pixel delta and redraw.
    pub fn apply_pan(&mut self, delta: Vec2) {
        self.view.apply_pan(delta);
        self.draw();
    }

    /// Mutate the outline and redraw.
    ///
    /// Fails with [`CanvasError::PathBusy`] if the path is already borrowed
    /// elsewhere.
    pub fn edit_path<R>(
        &mut self,
        edit: impl FnOnce(&mut dyn OutlinePath) -> R,
    ) -> Result<R, CanvasError> {
        let result = {
            let mut path = self.path.try_borrow_mut().map_err(|_| CanvasError::PathBusy)?;
            edit(&mut *path)
        };
        self.draw();
        Ok(result)
    }

    pub fn set_point(&mut self, index: usize, pos: Point) -> Result<(), CanvasError> {
        self.edit_path(|path| path.set_point(index, pos))?
    }

    /// Transform the points at `indices` of the controller's own path and
    /// redraw. Returns `false` when none of the indices exist.
    pub fn transform_points(
        &mut self,
        indices: &[usize],
        transform: SelectionTransform,
        origin: TransformOrigin,
    ) -> Result<bool, CanvasError> {
        self.edit_path(|path| transform.apply(path, indices, &origin))
    }

    pub fn set_layer_hidden(&mut self, layer: Layer, hidden: bool) {
        if let Some(item) = self.layer_mut(layer) {
            if item.hidden != hidden {
                item.hidden = hidden;
                self.draw();
            }
        }
    }
}

fn layer_index(layer: Layer) -> usize {
    Layer::ALL.iter().position(|l| *l == layer).unwrap_or_default()
}

/// The surface's ratio, or 1 when it reports nonsense.
fn device_pixel_ratio(surface: &impl Surface) -> f64 {
    let dpr = surface.device_pixel_ratio();
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        log::warn!("invalid device pixel ratio {dpr}; using 1");
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::OffscreenSurface;
    use kurbo::Size;
    use oc_core::PathBuilder;
    use oc_render::DrawCall;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn controller() -> CanvasController<OffscreenSurface> {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0).line_to(100.0, 0.0);
        let path: SharedPath = Rc::new(RefCell::new(b.build()));
        let surface = OffscreenSurface::new(Size::new(300.0, 200.0), 2.0);
        CanvasController::new(surface, path, ControllerConfig::default()).unwrap()
    }

    #[test]
    fn frame_preamble() {
        let c = controller();
        let calls = c.surface().recording().calls();
        assert_eq!(
            calls[..5].to_vec(),
            vec![
                DrawCall::ClearRect(Rect::new(0.0, 0.0, 600.0, 400.0)),
                DrawCall::Save,
                DrawCall::Scale(2.0, 2.0),
                DrawCall::Translate(0.0, 800.0),
                DrawCall::Scale(1.0, -1.0),
            ]
        );
        assert_eq!(calls.last(), Some(&DrawCall::Restore));
        assert_eq!(c.surface().recording().save_depth(), 0);
    }

    #[test]
    fn layer_indices_follow_paint_order() {
        assert_eq!(layer_index(Layer::Handles), 0);
        assert_eq!(layer_index(Layer::Hover), 3);
    }

    #[test]
    fn rejects_invalid_parameters() {
        let path: SharedPath = Rc::new(RefCell::new(PathBuilder::new().build()));
        let mut config = ControllerConfig::default();
        config.drawing.node_size = 0.0;
        let result = CanvasController::new(
            OffscreenSurface::new(Size::new(10.0, 10.0), 1.0),
            path,
            config,
        );
        assert!(matches!(
            result,
            Err(CanvasError::InvalidParameter { name: "nodeSize", .. })
        ));
    }

    #[test]
    fn bad_device_pixel_ratio_falls_back_to_one() {
        let mut c = controller();
        c.surface_mut().set_device_pixel_ratio(f64::NAN);
        c.handle_resize();
        assert_eq!(c.surface().backing_size(), (300, 200));
    }

    #[test]
    fn edit_while_borrowed_is_busy() {
        let mut c = controller();
        let path = c.path().clone();
        let _guard = path.borrow();
        assert_eq!(c.edit_path(|_| ()), Err(CanvasError::PathBusy));
    }
}
