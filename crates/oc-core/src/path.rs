//! Outline path model.
//!
//! `OutlinePath` is the contract the canvas needs from a glyph path: two
//! independent, restartable point traversals, a draw-into-`BezPath`
//! operation, and a flat coordinate buffer addressed by point index.
//! `PackedPath` is the packed representation used by the editor: one flag
//! byte per point plus a contour list of end points.

use crate::error::CanvasError;
use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Range;

/// Low bits of a point flag byte hold the point type.
pub const POINT_TYPE_MASK: u8 = 0x07;
/// Flag bit marking a smooth on-curve point.
pub const SMOOTH_FLAG: u8 = 0x08;

// ─── Points ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointType {
    OnCurve,
    OffCurveQuad,
    OffCurveCubic,
}

impl PointType {
    pub fn from_flags(flags: u8) -> Option<Self> {
        match flags & POINT_TYPE_MASK {
            0 => Some(Self::OnCurve),
            1 => Some(Self::OffCurveQuad),
            2 => Some(Self::OffCurveCubic),
            _ => None,
        }
    }

    pub fn flags(self) -> u8 {
        match self {
            Self::OnCurve => 0,
            Self::OffCurveQuad => 1,
            Self::OffCurveCubic => 2,
        }
    }

    /// True for control points. This is the non-zero type tag.
    pub fn is_off_curve(self) -> bool {
        self != Self::OnCurve
    }
}

/// A single outline point, compared by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    pub point_type: PointType,
    pub smooth: bool,
}

impl PathPoint {
    pub fn new(x: f64, y: f64, point_type: PointType, smooth: bool) -> Self {
        Self {
            x,
            y,
            point_type,
            smooth,
        }
    }

    pub fn on_curve(x: f64, y: f64) -> Self {
        Self::new(x, y, PointType::OnCurve, false)
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn flags(&self) -> u8 {
        let smooth = if self.smooth { SMOOTH_FLAG } else { 0 };
        self.point_type.flags() | smooth
    }
}

// ─── Path contract ───────────────────────────────────────────────────────

/// What the canvas consumes from a glyph path.
///
/// Traversals are lazy, finite, and may be restarted at will by calling
/// the method again.
pub trait OutlinePath {
    fn point_count(&self) -> usize;

    fn point(&self, index: usize) -> Option<PathPoint>;

    fn iter_points(&self) -> Box<dyn Iterator<Item = PathPoint> + '_>;

    /// Pairs of points forming a control arm (one on-curve, one off-curve).
    fn iter_handles(&self) -> Box<dyn Iterator<Item = (PathPoint, PathPoint)> + '_>;

    /// Append the outline to `sink`.
    fn draw_to_path(&self, sink: &mut BezPath);

    /// Flat `[x0, y0, x1, y1, ...]` buffer.
    fn coordinates(&self) -> &[f64];

    fn coordinates_mut(&mut self) -> &mut [f64];

    /// Move point `index` to `pos` through the coordinate buffer.
    fn set_point(&mut self, index: usize, pos: Point) -> Result<(), CanvasError> {
        let count = self.point_count();
        if index >= count {
            return Err(CanvasError::PointIndex { index, count });
        }
        let coords = self.coordinates_mut();
        coords[index * 2] = pos.x;
        coords[index * 2 + 1] = pos.y;
        Ok(())
    }
}

// ─── Packed path ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourInfo {
    /// Index of the last point of this contour.
    pub end_point: usize,
    pub is_closed: bool,
}

/// Wire shape of a packed path, validated into `PackedPath`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackedPathData {
    coordinates: Vec<f64>,
    point_types: Vec<u8>,
    contours: Vec<ContourInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PackedPathData", into = "PackedPathData")]
pub struct PackedPath {
    coordinates: Vec<f64>,
    point_types: Vec<u8>,
    contours: Vec<ContourInfo>,
}

impl TryFrom<PackedPathData> for PackedPath {
    type Error = CanvasError;

    fn try_from(data: PackedPathData) -> Result<Self, Self::Error> {
        PackedPath::new(data.coordinates, data.point_types, data.contours)
    }
}

impl From<PackedPath> for PackedPathData {
    fn from(path: PackedPath) -> Self {
        Self {
            coordinates: path.coordinates,
            point_types: path.point_types,
            contours: path.contours,
        }
    }
}

impl PackedPath {
    /// Build a packed path, checking that the three buffers agree.
    pub fn new(
        coordinates: Vec<f64>,
        point_types: Vec<u8>,
        contours: Vec<ContourInfo>,
    ) -> Result<Self, CanvasError> {
        let count = point_types.len();
        if coordinates.len() != count * 2 {
            return Err(CanvasError::MalformedPath(format!(
                "{} coordinates for {count} points",
                coordinates.len()
            )));
        }
        if let Some(pos) = point_types
            .iter()
            .position(|&flags| PointType::from_flags(flags).is_none())
        {
            return Err(CanvasError::MalformedPath(format!(
                "unknown point type {:#04x} at index {pos}",
                point_types[pos]
            )));
        }

        let mut next_start = 0;
        for contour in &contours {
            if contour.end_point < next_start || contour.end_point >= count {
                return Err(CanvasError::MalformedPath(format!(
                    "contour end point {} out of order",
                    contour.end_point
                )));
            }
            next_start = contour.end_point + 1;
        }
        if next_start != count {
            return Err(CanvasError::MalformedPath(format!(
                "contours cover {next_start} of {count} points"
            )));
        }

        Ok(Self {
            coordinates,
            point_types,
            contours,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        serde_json::from_str(json).map_err(|e| CanvasError::MalformedPath(e.to_string()))
    }

    pub fn contours(&self) -> &[ContourInfo] {
        &self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.point_types.is_empty()
    }

    /// Point index ranges of each contour, with the closed flag.
    pub fn contour_ranges(&self) -> impl Iterator<Item = (Range<usize>, bool)> + '_ {
        let mut start = 0;
        self.contours.iter().map(move |contour| {
            let range = start..contour.end_point + 1;
            start = contour.end_point + 1;
            (range, contour.is_closed)
        })
    }

    // Valid for any index < point_count(); buffers are checked on construction.
    fn point_at(&self, index: usize) -> PathPoint {
        let flags = self.point_types[index];
        PathPoint {
            x: self.coordinates[index * 2],
            y: self.coordinates[index * 2 + 1],
            point_type: PointType::from_flags(flags).unwrap_or(PointType::OnCurve),
            smooth: flags & SMOOTH_FLAG != 0,
        }
    }

    fn draw_contour(&self, range: Range<usize>, closed: bool, sink: &mut BezPath) {
        let points: SmallVec<[PathPoint; 16]> = range.map(|i| self.point_at(i)).collect();
        let count = points.len();
        if count == 0 {
            return;
        }

        let Some(first_on) = points.iter().position(|p| !p.point_type.is_off_curve()) else {
            // Only quadratic control points: the contour starts at an
            // implied on-curve point between the last and first.
            if closed {
                let start = points[count - 1].pos().midpoint(points[0].pos());
                sink.move_to(start);
                emit_segment(sink, &points, start);
                sink.close_path();
            } else {
                log::trace!("skipping open contour without on-curve points");
            }
            return;
        };

        sink.move_to(points[first_on].pos());
        let steps = if closed {
            1..count + 1
        } else {
            1..count - first_on
        };
        let mut pending: SmallVec<[PathPoint; 4]> = SmallVec::new();
        for step in steps {
            let point = points[(first_on + step) % count];
            if point.point_type.is_off_curve() {
                pending.push(point);
            } else {
                emit_segment(sink, &pending, point.pos());
                pending.clear();
            }
        }
        if closed {
            sink.close_path();
        }
    }
}

/// Emit one segment ending at on-curve `end` through the control points
/// collected since the previous on-curve point.
fn emit_segment(sink: &mut BezPath, controls: &[PathPoint], end: Point) {
    match controls {
        [] => sink.line_to(end),
        [c1, c2] if c1.point_type == PointType::OffCurveCubic => {
            sink.curve_to(c1.pos(), c2.pos(), end)
        }
        [c] => sink.quad_to(c.pos(), end),
        [.., last] => {
            // Quadratic spline: implied on-curve points halfway between
            // consecutive control points.
            for pair in controls.windows(2) {
                sink.quad_to(pair[0].pos(), pair[0].pos().midpoint(pair[1].pos()));
            }
            sink.quad_to(last.pos(), end);
        }
    }
}

impl OutlinePath for PackedPath {
    fn point_count(&self) -> usize {
        self.point_types.len()
    }

    fn point(&self, index: usize) -> Option<PathPoint> {
        (index < self.point_count()).then(|| self.point_at(index))
    }

    fn iter_points(&self) -> Box<dyn Iterator<Item = PathPoint> + '_> {
        Box::new((0..self.point_count()).map(|i| self.point_at(i)))
    }

    fn iter_handles(&self) -> Box<dyn Iterator<Item = (PathPoint, PathPoint)> + '_> {
        let pairs = self.contour_ranges().flat_map(|(range, closed)| {
            // With two points the wrap pair repeats (start, start + 1).
            let wrap = (closed && range.len() > 2).then(|| (range.end - 1, range.start));
            wrap.into_iter()
                .chain((range.start + 1..range.end).map(|i| (i - 1, i)))
        });
        Box::new(pairs.filter_map(|(a, b)| {
            let (pa, pb) = (self.point_at(a), self.point_at(b));
            (pa.point_type.is_off_curve() != pb.point_type.is_off_curve()).then_some((pa, pb))
        }))
    }

    fn draw_to_path(&self, sink: &mut BezPath) {
        for (range, closed) in self.contour_ranges() {
            self.draw_contour(range, closed, sink);
        }
    }

    fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    fn coordinates_mut(&mut self) -> &mut [f64] {
        &mut self.coordinates
    }
}

// ─── Builder ─────────────────────────────────────────────────────────────

/// Builds a `PackedPath` contour by contour.
///
/// ```
/// use oc_core::{OutlinePath, PathBuilder};
///
/// let mut builder = PathBuilder::new();
/// builder.move_to(0.0, 0.0).line_to(100.0, 0.0).line_to(100.0, 100.0).close();
/// let path = builder.build();
/// assert_eq!(path.point_count(), 3);
/// ```
#[derive(Debug, Default)]
pub struct PathBuilder {
    data: PackedPathData,
    contour_start: usize,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> usize {
        self.data.point_types.len() - self.contour_start
    }

    /// Append a raw point to the current contour.
    pub fn point(&mut self, point: PathPoint) -> &mut Self {
        self.data.coordinates.extend([point.x, point.y]);
        self.data.point_types.push(point.flags());
        self
    }

    /// Start a new contour, ending any pending one as open.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        if self.pending() > 0 {
            self.finish(false);
        }
        self.point(PathPoint::on_curve(x, y))
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.point(PathPoint::on_curve(x, y))
    }

    pub fn smooth_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.point(PathPoint::new(x, y, PointType::OnCurve, true))
    }

    pub fn cubic_to(&mut self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) -> &mut Self {
        self.point(PathPoint::new(c1.0, c1.1, PointType::OffCurveCubic, false))
            .point(PathPoint::new(c2.0, c2.1, PointType::OffCurveCubic, false))
            .line_to(end.0, end.1)
    }

    pub fn quad_to(&mut self, c: (f64, f64), end: (f64, f64)) -> &mut Self {
        self.point(PathPoint::new(c.0, c.1, PointType::OffCurveQuad, false))
            .line_to(end.0, end.1)
    }

    /// Close the current contour.
    pub fn close(&mut self) -> &mut Self {
        self.finish(true);
        self
    }

    fn finish(&mut self, is_closed: bool) {
        if self.pending() == 0 {
            return;
        }
        let end_point = self.data.point_types.len() - 1;
        self.data.contours.push(ContourInfo {
            end_point,
            is_closed,
        });
        self.contour_start = end_point + 1;
    }

    /// Finish the path; a pending contour is kept as open.
    pub fn build(mut self) -> PackedPath {
        self.finish(false);
        let PackedPathData {
            coordinates,
            point_types,
            contours,
        } = self.data;
        PackedPath {
            coordinates,
            point_types,
            contours,
        }
    }
}
