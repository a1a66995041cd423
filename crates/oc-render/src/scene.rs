//! Retained-mode scene items.
//!
//! A closed set of drawable kinds behind one `draw` entry point. The
//! `hidden` flag lives on the `SceneItem` wrapper so any kind can be
//! switched off without its container knowing why.
//!
//! Path-backed items share the outline through [`SharedPath`] and rebuild
//! their geometry every frame, so edits to the coordinate buffer show up
//! on the next draw without invalidation.

use crate::context::{CompositeOp, DrawContext, SavedState};
use crate::paint::{fill_node, stroke_node};
use kurbo::{BezPath, Line};
use oc_core::{DrawingParameters, OutlinePath, PathPoint};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// An outline shared between the controller and the items that draw it.
pub type SharedPath = Rc<RefCell<dyn OutlinePath>>;

/// Read-only view of the controller handed to every item during a frame.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub ctx: &'a dyn DrawContext,
    pub magnification: f64,
    pub params: &'a DrawingParameters,
}

impl RenderContext<'_> {
    /// Convert a screen-pixel size into logical units at the current zoom.
    pub fn screen_px(&self, size: f64) -> f64 {
        size / self.magnification
    }
}

// ─── Layers ──────────────────────────────────────────────────────────────

/// The fixed layers of the editing scene, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Handles,
    Outline,
    Nodes,
    Hover,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Handles, Layer::Outline, Layer::Nodes, Layer::Hover];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Handles => "handles",
            Layer::Outline => "outline",
            Layer::Nodes => "nodes",
            Layer::Hover => "hover",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.name() == name)
    }
}

// ─── Items ───────────────────────────────────────────────────────────────

pub struct SceneItem {
    pub hidden: bool,
    kind: SceneItemKind,
}

pub enum SceneItemKind {
    Composite(Composite),
    Outline(SharedPath),
    Handles(SharedPath),
    Nodes(SharedPath),
    Hover(HoverHighlight),
}

impl SceneItem {
    pub fn new(kind: SceneItemKind) -> Self {
        Self {
            hidden: false,
            kind,
        }
    }

    pub fn kind(&self) -> &SceneItemKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut SceneItemKind {
        &mut self.kind
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut Composite> {
        match &mut self.kind {
            SceneItemKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_hover(&self) -> Option<&HoverHighlight> {
        match &self.kind {
            SceneItemKind::Hover(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_hover_mut(&mut self) -> Option<&mut HoverHighlight> {
        match &mut self.kind {
            SceneItemKind::Hover(h) => Some(h),
            _ => None,
        }
    }

    /// Draw unless hidden.
    pub fn draw(&self, rc: &RenderContext<'_>) {
        if self.hidden {
            return;
        }
        match &self.kind {
            SceneItemKind::Composite(c) => c.draw(rc),
            SceneItemKind::Outline(path) => {
                if let Some(path) = borrow_path(path) {
                    draw_outline(rc, &*path);
                }
            }
            SceneItemKind::Handles(path) => {
                if let Some(path) = borrow_path(path) {
                    draw_handles(rc, &*path);
                }
            }
            SceneItemKind::Nodes(path) => {
                if let Some(path) = borrow_path(path) {
                    draw_nodes(rc, &*path);
                }
            }
            SceneItemKind::Hover(h) => h.draw(rc),
        }
    }
}

fn borrow_path(path: &SharedPath) -> Option<Ref<'_, dyn OutlinePath + 'static>> {
    match path.try_borrow() {
        Ok(path) => Some(path),
        Err(_) => {
            log::warn!("path is being edited during draw; skipping layer");
            None
        }
    }
}

/// Ordered children; insertion order is paint order (back to front).
#[derive(Default)]
pub struct Composite {
    items: Vec<SceneItem>,
}

impl Composite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item`, returning its index.
    pub fn push(&mut self, item: SceneItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&SceneItem> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SceneItem> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn draw(&self, rc: &RenderContext<'_>) {
        for item in &self.items {
            item.draw(rc);
        }
    }
}

fn draw_outline(rc: &RenderContext<'_>, path: &dyn OutlinePath) {
    let mut bez = BezPath::new();
    path.draw_to_path(&mut bez);
    log::trace!("PAINT outline ({} elements)", bez.elements().len());

    rc.ctx.set_line_width(rc.screen_px(rc.params.path_line_width));
    rc.ctx.set_stroke_color(rc.params.path_stroke_color);
    rc.ctx.stroke_path(&bez);
}

fn draw_handles(rc: &RenderContext<'_>, path: &dyn OutlinePath) {
    log::trace!("PAINT handles");
    rc.ctx.set_stroke_color(rc.params.handle_color);
    rc.ctx.set_line_width(rc.screen_px(rc.params.handle_line_width));
    for (a, b) in path.iter_handles() {
        rc.ctx.stroke_line(Line::new(a.pos(), b.pos()));
    }
}

fn draw_nodes(rc: &RenderContext<'_>, path: &dyn OutlinePath) {
    log::trace!("PAINT nodes ({})", path.point_count());
    let node_size = rc.screen_px(rc.params.node_size);
    rc.ctx.set_fill_color(rc.params.node_fill_color);
    for point in path.iter_points() {
        fill_node(rc.ctx, &point, node_size);
    }
}

// ─── Hover ───────────────────────────────────────────────────────────────

/// Highlight ring around the point under the pointer.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HoverHighlight {
    point: Option<PathPoint>,
}

impl HoverHighlight {
    pub fn point(&self) -> Option<&PathPoint> {
        self.point.as_ref()
    }

    /// Replace the hovered point. Returns whether it changed by value.
    pub fn set(&mut self, point: Option<PathPoint>) -> bool {
        if self.point == point {
            return false;
        }
        self.point = point;
        true
    }

    fn draw(&self, rc: &RenderContext<'_>) {
        let Some(point) = &self.point else {
            return;
        };
        log::trace!("PAINT hover ({:.1}, {:.1})", point.x, point.y);
        let ctx = SavedState::new(rc.ctx);
        ctx.set_composite(CompositeOp::Lighter);
        ctx.set_stroke_color(rc.params.hover_node_color);
        ctx.set_line_width(rc.screen_px(rc.params.hover_node_line_width));
        stroke_node(rc.ctx, point, rc.screen_px(rc.params.hover_node_size));
    }
}
