//! Node marker primitives.

use crate::context::DrawContext;
use kurbo::Circle;
use oc_core::{PathPoint, centered_rect};

/// Marker drawn for a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Circle,
    Square,
}

impl NodeShape {
    /// Off-curve points (non-zero type tag) get circles, on-curve points
    /// squares. The smooth flag is carried on the point but does not
    /// change the marker yet.
    pub fn for_point(point: &PathPoint) -> Self {
        if point.point_type.is_off_curve() {
            Self::Circle
        } else {
            Self::Square
        }
    }
}

/// Fill a marker of side/diameter `size` centered on `point`.
pub fn fill_node(ctx: &dyn DrawContext, point: &PathPoint, size: f64) {
    match NodeShape::for_point(point) {
        NodeShape::Circle => ctx.fill_circle(Circle::new(point.pos(), size / 2.0)),
        NodeShape::Square => ctx.fill_rect(centered_rect(point.pos(), size)),
    }
}

/// Outline a marker of side/diameter `size` centered on `point`.
pub fn stroke_node(ctx: &dyn DrawContext, point: &PathPoint, size: f64) {
    match NodeShape::for_point(point) {
        NodeShape::Circle => ctx.stroke_circle(Circle::new(point.pos(), size / 2.0)),
        NodeShape::Square => ctx.stroke_rect(centered_rect(point.pos(), size)),
    }
}
