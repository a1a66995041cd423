//! Outline Canvas editor engine.
//!
//! Drives an [`OutlinePath`](oc_core::OutlinePath) scene on any
//! [`Surface`]: sizing, the pan/zoom view, hover feedback, normalized
//! wheel and pinch input, and point transforms on a selection.

pub mod controller;
pub mod gesture;
pub mod input;
pub mod selection;
pub mod surface;

pub use controller::CanvasController;
pub use gesture::{PinchTracker, WheelAction, wheel_action};
pub use input::{EventResponse, GesturePhase, InputEvent};
pub use selection::{
    GlyphEditor, LayerGlyph, OriginX, OriginY, Selection, SelectionTransform, TransformOrigin,
    apply_selection_transform, selection_bounds,
};
pub use surface::{OffscreenSurface, Surface};
