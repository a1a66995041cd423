//! Canvas2D backend.
//!
//! Adapts `CanvasRenderingContext2d` to the scene's `DrawContext` and the
//! canvas element to the controller's `Surface`.

use kurbo::{BezPath, Circle, Line, PathEl, Rect, Size, Vec2};
use oc_core::Color;
use oc_editor::Surface;
use oc_render::{CompositeOp, DrawContext};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2d {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn trace(&self, path: &BezPath) {
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }

    fn circle(&self, circle: Circle) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(circle.center.x, circle.center.y, circle.radius, 0.0, TAU);
    }
}

impl DrawContext for Canvas2d {
    fn save(&self) {
        self.ctx.save();
    }

    fn restore(&self) {
        self.ctx.restore();
    }

    fn clear_rect(&self, rect: Rect) {
        self.ctx
            .clear_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn scale(&self, sx: f64, sy: f64) {
        let _ = self.ctx.scale(sx, sy);
    }

    fn translate(&self, tx: f64, ty: f64) {
        let _ = self.ctx.translate(tx, ty);
    }

    fn set_line_width(&self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_stroke_color(&self, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }

    fn set_fill_color(&self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }

    fn set_composite(&self, op: CompositeOp) {
        let _ = self.ctx.set_global_composite_operation(op.as_css());
    }

    fn stroke_path(&self, path: &BezPath) {
        self.ctx.begin_path();
        self.trace(path);
        self.ctx.stroke();
    }

    fn stroke_line(&self, line: Line) {
        self.ctx.begin_path();
        self.ctx.move_to(line.p0.x, line.p0.y);
        self.ctx.line_to(line.p1.x, line.p1.y);
        self.ctx.stroke();
    }

    fn fill_circle(&self, circle: Circle) {
        self.circle(circle);
        self.ctx.fill();
    }

    fn stroke_circle(&self, circle: Circle) {
        self.circle(circle);
        self.ctx.stroke();
    }

    fn fill_rect(&self, rect: Rect) {
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&self, rect: Rect) {
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }
}

// ─── Surface ─────────────────────────────────────────────────────────────

/// An `HtmlCanvasElement` that fills its parent element.
pub struct HtmlSurface {
    canvas: HtmlCanvasElement,
    window: Window,
    ctx: Canvas2d,
}

impl HtmlSurface {
    pub fn new(canvas: HtmlCanvasElement, window: Window) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            window,
            ctx: Canvas2d::new(ctx),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for HtmlSurface {
    type Context = Canvas2d;

    fn context(&self) -> &Canvas2d {
        &self.ctx
    }

    fn layout_size(&self) -> Size {
        match self.canvas.parent_element() {
            Some(parent) => {
                let rect = parent.get_bounding_client_rect();
                Size::new(rect.width(), rect.height())
            }
            None => Size::new(
                f64::from(self.canvas.client_width()),
                f64::from(self.canvas.client_height()),
            ),
        }
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn canvas_offset(&self) -> Vec2 {
        Vec2::new(
            f64::from(self.canvas.offset_left()),
            f64::from(self.canvas.offset_top()),
        )
    }

    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&mut self, width: u32, height: u32, css_size: Size) {
        // Assigning width/height clears the canvas even when unchanged.
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", css_size.width));
        let _ = style.set_property("height", &format!("{}px", css_size.height));
    }
}
