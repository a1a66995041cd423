//! The drawing sink scene items paint into.
//!
//! Mirrors the subset of the HTML Canvas 2D API the canvas needs. Methods
//! take `&self` like `web_sys::CanvasRenderingContext2d`, so one context
//! can be shared read-only by every item during a frame.

use kurbo::{BezPath, Circle, Line, Rect};
use oc_core::Color;
use std::ops::Deref;

/// Compositing mode for subsequent drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOp {
    SourceOver,
    /// Additive blending; overlapping strokes brighten.
    Lighter,
}

impl CompositeOp {
    /// Canvas `globalCompositeOperation` keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::Lighter => "lighter",
        }
    }
}

pub trait DrawContext {
    /// Push the drawing state (transform, styles, composite mode).
    fn save(&self);
    fn restore(&self);

    /// Clear a rectangle in untransformed backing-store pixels.
    fn clear_rect(&self, rect: Rect);
    fn scale(&self, sx: f64, sy: f64);
    fn translate(&self, tx: f64, ty: f64);

    fn set_line_width(&self, width: f64);
    fn set_stroke_color(&self, color: Color);
    fn set_fill_color(&self, color: Color);
    fn set_composite(&self, op: CompositeOp);

    fn stroke_path(&self, path: &BezPath);
    fn stroke_line(&self, line: Line);
    fn fill_circle(&self, circle: Circle);
    fn stroke_circle(&self, circle: Circle);
    fn fill_rect(&self, rect: Rect);
    fn stroke_rect(&self, rect: Rect);
}

/// Saves the drawing state on creation and restores it on drop, so every
/// exit path (including early returns) leaves the context balanced.
pub struct SavedState<'a, C: DrawContext + ?Sized> {
    ctx: &'a C,
}

impl<'a, C: DrawContext + ?Sized> SavedState<'a, C> {
    pub fn new(ctx: &'a C) -> Self {
        ctx.save();
        Self { ctx }
    }
}

impl<C: DrawContext + ?Sized> Deref for SavedState<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.ctx
    }
}

impl<C: DrawContext + ?Sized> Drop for SavedState<'_, C> {
    fn drop(&mut self) {
        self.ctx.restore();
    }
}
