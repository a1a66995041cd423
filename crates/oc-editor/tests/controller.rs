use kurbo::{Point, Size, Vec2};
use oc_core::{
    ControllerConfig, DrawingParameters, MAX_MAGNIFICATION, MIN_MAGNIFICATION, OutlinePath,
    PathBuilder, PointType,
};
use oc_editor::{
    CanvasController, GesturePhase, InputEvent, OffscreenSurface, SelectionTransform, Surface,
    TransformOrigin,
};
use oc_render::{DrawCall, Layer, SharedPath};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const EPS: f64 = 1e-9;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// On-curve (0,0), cubic handles (0,100) and (50,100), on-curve (100,100)
/// and (100,0); closed.
fn bowl() -> SharedPath {
    let mut b = PathBuilder::new();
    b.move_to(0.0, 0.0)
        .cubic_to((0.0, 100.0), (50.0, 100.0), (100.0, 100.0))
        .line_to(100.0, 0.0)
        .close();
    Rc::new(RefCell::new(b.build()))
}

fn controller_with(config: ControllerConfig) -> CanvasController<OffscreenSurface> {
    init_logging();
    let surface = OffscreenSurface::new(Size::new(800.0, 600.0), 1.0);
    CanvasController::new(surface, bowl(), config).unwrap()
}

fn controller() -> CanvasController<OffscreenSurface> {
    controller_with(ControllerConfig::default())
}

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
        "{a:?} != {b:?}"
    );
}

// ─── View ────────────────────────────────────────────────────────────────

#[test]
fn default_origin_maps_to_logical_zero() {
    let c = controller();
    assert_eq!(c.frame_count(), 1);
    assert_close(c.screen_to_logical(Point::new(0.0, 800.0)), Point::ZERO);
}

#[test]
fn zoom_about_screen_zero_keeps_origin() {
    let mut c = controller_with(ControllerConfig {
        origin: Point::ZERO,
        ..ControllerConfig::default()
    });
    c.apply_zoom(Point::ZERO, 2.0);
    assert_eq!(c.magnification(), 2.0);
    assert_close(c.origin(), Point::ZERO);
    assert_eq!(c.frame_count(), 2);
}

#[test]
fn pan_moves_origin_against_delta() {
    let mut c = controller();
    c.apply_pan(Vec2::new(10.0, -5.0));
    assert_close(c.origin(), Point::new(-10.0, 805.0));
}

#[test]
fn zoom_keeps_pivot_in_place() {
    let mut c = controller();
    let logical = Point::new(37.0, 12.5);
    let screen = c.logical_to_screen(logical);
    c.apply_zoom(screen, 1.7);
    assert_close(c.logical_to_screen(logical), screen);
}

#[test]
fn round_trip_with_canvas_offset() {
    init_logging();
    let surface =
        OffscreenSurface::new(Size::new(400.0, 300.0), 2.0).with_offset(Vec2::new(20.0, 30.0));
    let mut c = CanvasController::new(surface, bowl(), ControllerConfig::default()).unwrap();
    c.apply_zoom(Point::new(150.0, 420.0), 3.25);
    for p in [Point::ZERO, Point::new(-40.0, 900.0), Point::new(0.5, -0.25)] {
        assert_close(c.screen_to_logical(c.logical_to_screen(p)), p);
    }
}

// ─── Wheel ───────────────────────────────────────────────────────────────

#[test]
fn wheel_zoom_stays_clamped() {
    let mut c = controller();
    for _ in 0..4 {
        c.handle_wheel(Point::new(400.0, 300.0), Vec2::new(0.0, -1000.0), true);
        let m = c.magnification();
        assert!((MIN_MAGNIFICATION..=MAX_MAGNIFICATION).contains(&m), "{m}");
    }
    assert_eq!(c.magnification(), MAX_MAGNIFICATION);

    for _ in 0..8 {
        c.handle_wheel(Point::new(400.0, 300.0), Vec2::new(0.0, 99.0), true);
        let m = c.magnification();
        assert!((MIN_MAGNIFICATION..=MAX_MAGNIFICATION).contains(&m), "{m}");
    }
    assert_eq!(c.magnification(), MIN_MAGNIFICATION);
}

#[test]
fn plain_wheel_pans_dominant_axis() {
    let mut c = controller();
    c.handle_wheel(Point::ZERO, Vec2::new(10.0, 3.0), false);
    assert_close(c.origin(), Point::new(-10.0, 800.0));
    c.handle_wheel(Point::ZERO, Vec2::new(1.0, -6.0), false);
    assert_close(c.origin(), Point::new(-10.0, 806.0));
    assert_eq!(c.magnification(), 1.0);
}

// ─── Pinch ───────────────────────────────────────────────────────────────

#[test]
fn pinch_scale_is_cumulative() {
    let mut c = controller();
    let pivot = Point::new(100.0, 700.0);
    c.handle_gesture_start(pivot, 1.0);
    assert!(c.handle_gesture_change(pivot, 2.0));
    assert!((c.magnification() - 2.0).abs() < EPS);
    assert!(c.handle_gesture_change(pivot, 3.0));
    assert!((c.magnification() - 3.0).abs() < EPS);
    c.handle_gesture_end();

    let frames = c.frame_count();
    assert!(!c.handle_gesture_change(pivot, 4.0));
    assert!((c.magnification() - 3.0).abs() < EPS);
    assert_eq!(c.frame_count(), frames);
}

#[test]
fn pinch_past_limit_does_not_drift() {
    let mut c = controller();
    let pivot = Point::new(400.0, 300.0);
    c.handle_gesture_start(pivot, 1.0);
    c.handle_gesture_change(pivot, 500.0);
    assert_eq!(c.magnification(), MAX_MAGNIFICATION);
    c.handle_gesture_change(pivot, 2.0);
    assert!((c.magnification() - 2.0).abs() < EPS);
}

#[test]
fn pinch_start_applies_first_scale() {
    let mut c = controller();
    let pivot = Point::new(0.0, 800.0);
    c.handle_gesture_start(pivot, 1.5);
    assert!((c.magnification() - 1.5).abs() < EPS);
    assert!(c.handle_gesture_change(pivot, 2.0));
    assert!((c.magnification() - 2.0).abs() < EPS);
}

#[test]
fn pinch_keeps_off_origin_pivot_in_place() {
    let mut c = controller();
    let pivot = Point::new(250.0, 430.0);
    let anchored = c.screen_to_logical(pivot);

    c.handle_gesture_start(pivot, 1.5);
    assert!((c.magnification() - 1.5).abs() < EPS);
    assert_close(c.logical_to_screen(anchored), pivot);

    c.handle_gesture_change(pivot, 2.0);
    assert!((c.magnification() - 2.0).abs() < EPS);
    assert_close(c.logical_to_screen(anchored), pivot);
    c.handle_gesture_end();
}

// ─── Hover ───────────────────────────────────────────────────────────────

#[test]
fn hover_redraws_once_per_change() {
    let mut c = controller();
    assert!(c.handle_pointer_move(Point::new(1.0, 799.0)));
    assert_eq!(c.frame_count(), 2);
    assert_eq!(c.hovered_point().map(|p| p.pos()), Some(Point::ZERO));

    assert!(!c.handle_pointer_move(Point::new(1.0, 799.0)));
    assert!(!c.handle_pointer_move(Point::new(-2.0, 801.0)));
    assert_eq!(c.frame_count(), 2);

    assert!(c.handle_pointer_move(Point::new(500.0, 100.0)));
    assert_eq!(c.hovered_point(), None);
    assert_eq!(c.frame_count(), 3);
}

#[test]
fn hover_square_scales_with_magnification() {
    let mut c = controller_with(ControllerConfig {
        magnification: 0.1,
        ..ControllerConfig::default()
    });
    // Logical (30, 100): the square spans 80 units, covering (0,100) and
    // the closer (50,100). Traversal order wins.
    c.handle_pointer_move(Point::new(3.0, 790.0));
    let hovered = c.hovered_point().unwrap();
    assert_eq!(hovered.pos(), Point::new(0.0, 100.0));
    assert_eq!(hovered.point_type, PointType::OffCurveCubic);
}

#[test]
fn hover_draws_highlight_ring() {
    let mut c = controller();
    c.surface().recording().take();
    c.handle_pointer_move(Point::new(100.0, 700.0));
    let calls = c.surface().recording().take();
    assert!(calls.contains(&DrawCall::StrokeRect(kurbo::Rect::new(
        93.0, 93.0, 107.0, 107.0
    ))));
    assert_eq!(c.surface().recording().save_depth(), 0);
}

// ─── Resize ──────────────────────────────────────────────────────────────

#[test]
fn resize_is_idempotent() {
    let mut c = controller();
    assert_eq!(c.surface().backing_size(), (800, 600));
    c.handle_resize();
    c.handle_resize();
    assert_eq!(c.surface().resize_count(), 1);

    c.surface_mut().set_layout(Size::new(333.3, 100.0));
    c.surface_mut().set_device_pixel_ratio(1.5);
    c.handle_resize();
    assert_eq!(c.surface().backing_size(), (499, 150));
    assert_eq!(c.surface().css_size(), Size::new(333.3, 100.0));
    assert_eq!(c.surface().resize_count(), 2);
}

// ─── Event dispatch ──────────────────────────────────────────────────────

#[test]
fn dispatch_reports_default_suppression() {
    let mut c = controller();

    let r = c.handle_event(&InputEvent::wheel(0.0, 0.0, 0.0, 4.0, false));
    assert!(r.redrawn && r.prevent_default);

    let r = c.handle_event(&InputEvent::pointer_move(600.0, 10.0));
    assert!(!r.redrawn && !r.prevent_default);

    let r = c.handle_event(&InputEvent::gesture(GesturePhase::Change, 2.0, 0.0, 0.0));
    assert!(!r.redrawn && r.prevent_default);

    let r = c.handle_event(&InputEvent::gesture(GesturePhase::Start, 1.0, 0.0, 0.0));
    assert!(r.redrawn);
    let r = c.handle_event(&InputEvent::gesture(GesturePhase::End, 1.0, 0.0, 0.0));
    assert!(!r.redrawn && r.prevent_default);

    let r = c.handle_event(&InputEvent::Resize);
    assert!(r.redrawn && !r.prevent_default);
}

// ─── Layers and edits ────────────────────────────────────────────────────

#[test]
fn hidden_nodes_layer_paints_no_markers() {
    let mut c = controller();
    c.surface().recording().take();
    c.set_layer_hidden(Layer::Nodes, true);
    assert!(c.is_layer_hidden(Layer::Nodes));

    let calls = c.surface().recording().take();
    assert!(calls.iter().any(|call| matches!(call, DrawCall::StrokePath(_))));
    assert!(
        !calls
            .iter()
            .any(|call| matches!(call, DrawCall::FillRect(_) | DrawCall::FillCircle(_)))
    );

    let frames = c.frame_count();
    c.set_layer_hidden(Layer::Nodes, true);
    assert_eq!(c.frame_count(), frames);
}

#[test]
fn edits_show_up_in_next_frame() {
    let mut c = controller();
    c.set_point(4, Point::new(120.0, -20.0)).unwrap();
    assert_eq!(c.frame_count(), 2);
    assert_eq!(
        c.path().borrow().point(4).map(|p| p.pos()),
        Some(Point::new(120.0, -20.0))
    );

    assert!(c.set_point(99, Point::ZERO).is_err());

    c.handle_pointer_move(c.logical_to_screen(Point::new(120.0, -20.0)));
    assert_eq!(
        c.hovered_point().map(|p| p.pos()),
        Some(Point::new(120.0, -20.0))
    );
}

#[test]
fn transform_points_moves_and_redraws() {
    let mut c = controller();
    let moved = c
        .transform_points(
            &[3, 4],
            SelectionTransform::Move { dx: 0.0, dy: 10.0 },
            TransformOrigin::default(),
        )
        .unwrap();
    assert!(moved);
    let path = c.path().borrow();
    assert_eq!(path.coordinates()[6..].to_vec(), vec![100.0, 110.0, 100.0, 10.0]);
}

#[test]
fn drawing_parameters_are_fixed_at_construction() {
    let drawing = DrawingParameters {
        node_size: 20.0,
        ..DrawingParameters::default()
    };
    let mut c = controller_with(ControllerConfig {
        drawing: drawing.clone(),
        ..ControllerConfig::default()
    });
    assert_eq!(c.drawing_parameters(), &drawing);

    // Logical (9, 0) is outside the default 8px square but inside 20px.
    assert!(c.handle_pointer_move(Point::new(9.0, 800.0)));
    assert_eq!(c.hovered_point().map(|p| p.pos()), Some(Point::ZERO));
}

#[test]
fn invalid_initial_parameters_are_rejected() {
    init_logging();
    let config = ControllerConfig {
        drawing: DrawingParameters {
            hover_node_size: -1.0,
            ..DrawingParameters::default()
        },
        ..ControllerConfig::default()
    };
    let surface = OffscreenSurface::new(Size::new(10.0, 10.0), 1.0);
    assert!(CanvasController::new(surface, bowl(), config).is_err());
}
