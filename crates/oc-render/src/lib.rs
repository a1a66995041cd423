pub mod context;
pub mod hit;
pub mod paint;
pub mod record;
pub mod scene;

pub use context::{CompositeOp, DrawContext, SavedState};
pub use hit::hit_test_point;
pub use record::{DrawCall, RecordingContext};
pub use scene::{Composite, HoverHighlight, Layer, RenderContext, SceneItem, SceneItemKind, SharedPath};
