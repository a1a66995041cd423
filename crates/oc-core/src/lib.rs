pub mod error;
pub mod geometry;
pub mod params;
pub mod path;
pub mod view;

pub use error::CanvasError;
pub use geometry::{centered_rect, point_in_rect};
pub use params::{Color, ControllerConfig, DrawingParameters};
pub use path::{ContourInfo, OutlinePath, PackedPath, PathBuilder, PathPoint, PointType};
pub use view::{MAX_MAGNIFICATION, MIN_MAGNIFICATION, ViewTransform};

// Re-export kurbo types so downstream crates share one geometry vocabulary
pub use kurbo::{BezPath, Circle, Line, PathEl, Point, Rect, Size, Vec2};
