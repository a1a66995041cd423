//! Error type shared by the outline canvas crates.
//!
//! Rendering and event handling never fail; constructors that take
//! external data and path edits return errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    #[error("invalid color `{0}`: expected #RGB, #RGBA, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("drawing parameter `{name}` must be a positive finite number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("invalid drawing parameters: {0}")]
    Config(String),

    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("point index {index} out of range for path with {count} points")]
    PointIndex { index: usize, count: usize },

    #[error("path is borrowed elsewhere and cannot be edited now")]
    PathBusy,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
