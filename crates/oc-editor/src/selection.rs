//! Transforms applied to the selected points of a glyph.
//!
//! Geometry runs through `kurbo::Affine`, pinned at a point derived from
//! the selection's bounding box. Edits go through a [`GlyphEditor`]
//! collaborator that owns undo recording and the set of edited layers.

use kurbo::{Affine, Point, Rect, Vec2};
use oc_core::OutlinePath;
use serde::{Deserialize, Serialize};

/// Bounding box of the points at `indices`. Out-of-range indices are
/// skipped; `None` when nothing remains.
pub fn selection_bounds(path: &dyn OutlinePath, indices: &[usize]) -> Option<Rect> {
    indices
        .iter()
        .filter_map(|&i| path.point(i))
        .map(|p| p.pos())
        .fold(None, |bounds, p| {
            Some(match bounds {
                None => Rect::from_points(p, p),
                Some(r) => r.union_pt(p),
            })
        })
}

// ─── Origin ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OriginX {
    Left,
    #[default]
    Center,
    Right,
    /// An explicit logical x.
    At(f64),
}

/// Vertical pin. Logical space is Y-up, so `Top` is the maximum y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OriginY {
    Top,
    #[default]
    Middle,
    Bottom,
    At(f64),
}

/// Where rotation and scaling are pinned, relative to the selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformOrigin {
    #[serde(default)]
    pub x: OriginX,
    #[serde(default)]
    pub y: OriginY,
}

impl TransformOrigin {
    pub fn new(x: OriginX, y: OriginY) -> Self {
        Self { x, y }
    }

    pub fn pin_point(&self, bounds: Rect) -> Point {
        let x = match self.x {
            OriginX::Left => bounds.x0,
            OriginX::Center => (bounds.x0 + bounds.x1) / 2.0,
            OriginX::Right => bounds.x1,
            OriginX::At(x) => x,
        };
        let y = match self.y {
            OriginY::Top => bounds.y1,
            OriginY::Middle => (bounds.y0 + bounds.y1) / 2.0,
            OriginY::Bottom => bounds.y0,
            OriginY::At(y) => y,
        };
        Point::new(x, y)
    }
}

// ─── Transforms ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SelectionTransform {
    Move { dx: f64, dy: f64 },
    /// Positive degrees turn clockwise on screen.
    Rotate { degrees: f64 },
    /// Factors, 1.0 = unchanged.
    Scale { x: f64, y: f64 },
    /// Mirror left-right: negate x about the pin's vertical line.
    FlipHorizontal,
    /// Mirror top-bottom: negate y about the pin's horizontal line.
    FlipVertical,
}

impl SelectionTransform {
    pub fn uniform_scale(factor: f64) -> Self {
        Self::Scale {
            x: factor,
            y: factor,
        }
    }

    /// Label recorded with the undo step.
    pub fn undo_label(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Rotate { .. } => "rotation",
            Self::Scale { .. } => "scale",
            Self::FlipHorizontal => "flip horizontally",
            Self::FlipVertical => "flip vertically",
        }
    }

    pub fn affine(&self, pin: Point) -> Affine {
        match *self {
            Self::Move { dx, dy } => Affine::translate(Vec2::new(dx, dy)),
            Self::Rotate { degrees } => Affine::rotate_about((-degrees).to_radians(), pin),
            Self::Scale { x, y } => scale_about(x, y, pin),
            Self::FlipHorizontal => scale_about(-1.0, 1.0, pin),
            Self::FlipVertical => scale_about(1.0, -1.0, pin),
        }
    }

    /// Transform the points at `indices` in place. Each index is moved at
    /// most once. Returns `false` when no listed index exists.
    pub fn apply(
        &self,
        path: &mut dyn OutlinePath,
        indices: &[usize],
        origin: &TransformOrigin,
    ) -> bool {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();

        let Some(bounds) = selection_bounds(path, &indices) else {
            return false;
        };
        let affine = self.affine(origin.pin_point(bounds));
        for i in indices {
            let Some(point) = path.point(i) else {
                continue;
            };
            if let Err(e) = path.set_point(i, affine * point.pos()) {
                log::warn!("{} skipped point {i}: {e}", self.undo_label());
            }
        }
        true
    }
}

fn scale_about(sx: f64, sy: f64, pin: Point) -> Affine {
    Affine::translate(pin.to_vec2())
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate(-pin.to_vec2())
}

// ─── Editing collaborator ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Indices into the point buffer.
    pub points: Vec<usize>,
    /// Indices of selected components.
    pub components: Vec<usize>,
}

/// One layer's outline handed to an edit.
pub struct LayerGlyph<'a> {
    pub layer_name: &'a str,
    pub path: &'a mut dyn OutlinePath,
}

/// The glyph editing session a selection transform runs against.
pub trait GlyphEditor {
    fn selection(&self) -> Selection;

    /// Run `mutator` over every edited layer as one undoable step, labelled
    /// with the string it returns.
    fn edit_and_record(&mut self, mutator: &mut dyn FnMut(&mut [LayerGlyph<'_>]) -> String);
}

/// Apply `transform` to the current point selection of every edited layer.
///
/// Needs at least two selected points; single points and component-only
/// selections are left alone. Returns the undo label when an edit was
/// recorded.
pub fn apply_selection_transform(
    editor: &mut dyn GlyphEditor,
    transform: SelectionTransform,
    origin: TransformOrigin,
) -> Option<&'static str> {
    let selection = editor.selection();
    if selection.points.len() < 2 {
        log::debug!(
            "{}: {} point(s) selected, nothing to do",
            transform.undo_label(),
            selection.points.len()
        );
        return None;
    }

    let label = transform.undo_label();
    editor.edit_and_record(&mut |layers| {
        for layer in layers.iter_mut() {
            if !transform.apply(&mut *layer.path, &selection.points, &origin) {
                log::debug!("{label}: no selected points in layer {}", layer.layer_name);
            }
        }
        label.to_string()
    });
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oc_core::PathBuilder;
    use pretty_assertions::assert_eq;

    fn square() -> oc_core::PackedPath {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0)
            .line_to(100.0, 0.0)
            .line_to(100.0, 50.0)
            .line_to(0.0, 50.0)
            .close();
        b.build()
    }

    fn positions(path: &dyn OutlinePath) -> Vec<(f64, f64)> {
        path.iter_points()
            .map(|p| (p.x.round(), p.y.round()))
            .collect()
    }

    #[test]
    fn bounds_skip_missing_indices() {
        let path = square();
        assert_eq!(
            selection_bounds(&path, &[0, 2, 99]),
            Some(Rect::new(0.0, 0.0, 100.0, 50.0))
        );
        assert_eq!(selection_bounds(&path, &[99]), None);
    }

    #[test]
    fn pin_points() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(
            TransformOrigin::default().pin_point(bounds),
            Point::new(50.0, 25.0)
        );
        assert_eq!(
            TransformOrigin::new(OriginX::Left, OriginY::Top).pin_point(bounds),
            Point::new(0.0, 50.0)
        );
        assert_eq!(
            TransformOrigin::new(OriginX::At(7.0), OriginY::Bottom).pin_point(bounds),
            Point::new(7.0, 0.0)
        );
    }

    #[test]
    fn move_selected_only() {
        let mut path = square();
        SelectionTransform::Move { dx: 10.0, dy: -5.0 }.apply(
            &mut path,
            &[1, 2],
            &TransformOrigin::default(),
        );
        assert_eq!(
            positions(&path),
            vec![(0.0, 0.0), (110.0, -5.0), (110.0, 45.0), (0.0, 50.0)]
        );
    }

    #[test]
    fn duplicate_indices_move_once() {
        let mut path = square();
        SelectionTransform::Move { dx: 1.0, dy: 0.0 }.apply(
            &mut path,
            &[0, 0, 1],
            &TransformOrigin::default(),
        );
        assert_eq!(positions(&path)[..2].to_vec(), vec![(1.0, 0.0), (101.0, 0.0)]);
    }

    #[test]
    fn rotate_clockwise_about_bottom_left() {
        let mut path = square();
        let origin = TransformOrigin::new(OriginX::Left, OriginY::Bottom);
        SelectionTransform::Rotate { degrees: 90.0 }.apply(&mut path, &[0, 1, 2, 3], &origin);
        assert_eq!(
            positions(&path),
            vec![(0.0, 0.0), (0.0, -100.0), (50.0, -100.0), (50.0, 0.0)]
        );
    }

    #[test]
    fn scale_about_center() {
        let mut path = square();
        SelectionTransform::uniform_scale(2.0).apply(
            &mut path,
            &[0, 1, 2, 3],
            &TransformOrigin::default(),
        );
        assert_eq!(
            positions(&path),
            vec![(-50.0, -25.0), (150.0, -25.0), (150.0, 75.0), (-50.0, 75.0)]
        );
    }

    #[test]
    fn flips_mirror_within_bounds() {
        let mut path = square();
        let origin = TransformOrigin::default();
        SelectionTransform::FlipHorizontal.apply(&mut path, &[0, 1], &origin);
        assert_eq!(positions(&path)[..2].to_vec(), vec![(100.0, 0.0), (0.0, 0.0)]);

        SelectionTransform::FlipVertical.apply(&mut path, &[1, 2], &origin);
        assert_eq!(positions(&path)[1..3].to_vec(), vec![(0.0, 50.0), (100.0, 0.0)]);
    }

    #[test]
    fn transforms_parse_from_json() {
        let t: SelectionTransform =
            serde_json::from_str(r#"{"kind":"rotate","degrees":45}"#).unwrap();
        assert_eq!(t, SelectionTransform::Rotate { degrees: 45.0 });
        let t: SelectionTransform = serde_json::from_str(r#"{"kind":"flipVertical"}"#).unwrap();
        assert_eq!(t, SelectionTransform::FlipVertical);
        let o: TransformOrigin = serde_json::from_str(r#"{"x":"left","y":{"at":12}}"#).unwrap();
        assert_eq!(o, TransformOrigin::new(OriginX::Left, OriginY::At(12.0)));
    }
}
