//! The host a controller draws onto.
//!
//! In the browser this is an `HtmlCanvasElement` and its 2D context; in
//! tests an [`OffscreenSurface`] backed by a recording context.

use kurbo::{Size, Vec2};
use oc_render::{DrawContext, RecordingContext};

pub trait Surface {
    type Context: DrawContext;

    fn context(&self) -> &Self::Context;

    /// Layout size of the element the canvas fills, in CSS pixels.
    fn layout_size(&self) -> Size;

    fn device_pixel_ratio(&self) -> f64;

    /// Top-left corner of the canvas in page coordinates.
    fn canvas_offset(&self) -> Vec2;

    /// Backing store size in device pixels.
    fn backing_size(&self) -> (u32, u32);

    /// Resize the backing store to `width` x `height` device pixels and
    /// display it at `css_size`.
    fn set_backing_size(&mut self, width: u32, height: u32, css_size: Size);
}

/// A surface with scripted layout that records what is drawn.
#[derive(Debug)]
pub struct OffscreenSurface {
    ctx: RecordingContext,
    layout: Size,
    device_pixel_ratio: f64,
    offset: Vec2,
    backing: (u32, u32),
    css_size: Size,
    resizes: usize,
}

impl OffscreenSurface {
    pub fn new(layout: Size, device_pixel_ratio: f64) -> Self {
        Self {
            ctx: RecordingContext::new(),
            layout,
            device_pixel_ratio,
            offset: Vec2::ZERO,
            backing: (0, 0),
            css_size: Size::ZERO,
            resizes: 0,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Change the parent layout, as a window resize would.
    pub fn set_layout(&mut self, layout: Size) {
        self.layout = layout;
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = ratio;
    }

    pub fn css_size(&self) -> Size {
        self.css_size
    }

    /// Number of times the backing store was actually resized.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    pub fn recording(&self) -> &RecordingContext {
        &self.ctx
    }
}

impl Surface for OffscreenSurface {
    type Context = RecordingContext;

    fn context(&self) -> &RecordingContext {
        &self.ctx
    }

    fn layout_size(&self) -> Size {
        self.layout
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    fn canvas_offset(&self) -> Vec2 {
        self.offset
    }

    fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    fn set_backing_size(&mut self, width: u32, height: u32, css_size: Size) {
        // Mirrors the DOM: assigning an unchanged size is not a resize.
        if self.backing != (width, height) {
            self.resizes += 1;
        }
        self.backing = (width, height);
        self.css_size = css_size;
    }
}
