//! A `DrawContext` that records calls instead of painting.
//!
//! Used by tests across the workspace to count and inspect drawing.

use crate::context::{CompositeOp, DrawContext};
use kurbo::{BezPath, Circle, Line, Rect};
use oc_core::Color;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    ClearRect(Rect),
    Scale(f64, f64),
    Translate(f64, f64),
    LineWidth(f64),
    StrokeColor(Color),
    FillColor(Color),
    Composite(CompositeOp),
    StrokePath(BezPath),
    StrokeLine(Line),
    FillCircle(Circle),
    StrokeCircle(Circle),
    FillRect(Rect),
    StrokeRect(Rect),
}

impl DrawCall {
    /// True for calls that put pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            Self::StrokePath(_)
                | Self::StrokeLine(_)
                | Self::FillCircle(_)
                | Self::StrokeCircle(_)
                | Self::FillRect(_)
                | Self::StrokeRect(_)
        )
    }
}

#[derive(Debug, Default)]
pub struct RecordingContext {
    calls: RefCell<Vec<DrawCall>>,
    depth: Cell<i32>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: DrawCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls.borrow().clone()
    }

    /// Drain the recorded calls.
    pub fn take(&self) -> Vec<DrawCall> {
        self.calls.take()
    }

    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    pub fn paint_count(&self) -> usize {
        self.calls.borrow().iter().filter(|c| c.is_paint()).count()
    }

    /// Outstanding `save` calls not yet matched by `restore`.
    pub fn save_depth(&self) -> i32 {
        self.depth.get()
    }
}

impl DrawContext for RecordingContext {
    fn save(&self) {
        self.depth.set(self.depth.get() + 1);
        self.push(DrawCall::Save);
    }

    fn restore(&self) {
        self.depth.set(self.depth.get() - 1);
        self.push(DrawCall::Restore);
    }

    fn clear_rect(&self, rect: Rect) {
        self.push(DrawCall::ClearRect(rect));
    }

    fn scale(&self, sx: f64, sy: f64) {
        self.push(DrawCall::Scale(sx, sy));
    }

    fn translate(&self, tx: f64, ty: f64) {
        self.push(DrawCall::Translate(tx, ty));
    }

    fn set_line_width(&self, width: f64) {
        self.push(DrawCall::LineWidth(width));
    }

    fn set_stroke_color(&self, color: Color) {
        self.push(DrawCall::StrokeColor(color));
    }

    fn set_fill_color(&self, color: Color) {
        self.push(DrawCall::FillColor(color));
    }

    fn set_composite(&self, op: CompositeOp) {
        self.push(DrawCall::Composite(op));
    }

    fn stroke_path(&self, path: &BezPath) {
        self.push(DrawCall::StrokePath(path.clone()));
    }

    fn stroke_line(&self, line: Line) {
        self.push(DrawCall::StrokeLine(line));
    }

    fn fill_circle(&self, circle: Circle) {
        self.push(DrawCall::FillCircle(circle));
    }

    fn stroke_circle(&self, circle: Circle) {
        self.push(DrawCall::StrokeCircle(circle));
    }

    fn fill_rect(&self, rect: Rect) {
        self.push(DrawCall::FillRect(rect));
    }

    fn stroke_rect(&self, rect: Rect) {
        self.push(DrawCall::StrokeRect(rect));
    }
}
