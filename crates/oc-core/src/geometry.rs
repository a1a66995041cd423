//! Small geometry helpers used by hit testing.

use kurbo::{Point, Rect, Size};

/// Inclusive point-in-rect test.
///
/// `kurbo::Rect::contains` excludes the max edges; hover hit testing
/// treats a point sitting exactly on the square's border as inside.
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// An axis-aligned square of side `side` centered on `center`.
pub fn centered_rect(center: Point, side: f64) -> Rect {
    Rect::from_center_size(center, Size::new(side, side))
}
