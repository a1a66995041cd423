//! Hit testing: logical point → hovered outline point.

use kurbo::Point;
use oc_core::{OutlinePath, PathPoint, centered_rect, point_in_rect};

/// Find the first point (in traversal order) inside the square of side
/// `side` centered on `center`.
///
/// Order wins over distance: a farther point that comes earlier in the
/// path is returned before a closer later one.
pub fn hit_test_point(path: &dyn OutlinePath, center: Point, side: f64) -> Option<PathPoint> {
    let rect = centered_rect(center, side);
    path.iter_points().find(|p| point_in_rect(p.pos(), rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_core::{PackedPath, PathBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn first_match_beats_nearest() {
        let mut b = PathBuilder::new();
        b.move_to(3.0, 3.0).line_to(0.5, 0.0).line_to(100.0, 0.0);
        let path = b.build();
        let hit = hit_test_point(&path, Point::ZERO, 8.0);
        assert_eq!(hit.map(|p| p.pos()), Some(Point::new(3.0, 3.0)));
    }

    #[test]
    fn miss_outside_square() {
        let mut b = PathBuilder::new();
        b.move_to(10.0, 10.0);
        assert_eq!(hit_test_point(&b.build(), Point::ZERO, 8.0), None);
    }

    #[test]
    fn empty_path_never_hits() {
        assert_eq!(hit_test_point(&PackedPath::default(), Point::ZERO, 8.0), None);
    }
}
