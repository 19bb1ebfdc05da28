//! Inkboard Core Library
//!
//! Platform-agnostic drawing engine: stroke smoothing, committed objects,
//! selection with resize handles, the eraser and the pointer controller.
//! Pixel output goes through the traits in [`render`].

pub mod canvas;
pub mod config;
pub mod engine;
pub mod eraser;
pub mod geometry;
pub mod input;
pub mod objects;
pub mod overlay;
pub mod page;
pub mod render;
pub mod selection;
pub mod smoothing;
pub mod tools;

pub use canvas::CanvasDocument;
pub use config::{ConfigError, EngineConfig};
pub use engine::Engine;
pub use eraser::EraserState;
pub use geometry::{BoundingBox, Sample, rgba};
pub use input::{FrameThrottle, PointerEvent, Redraw};
pub use objects::{DrawableObject, ObjectId, ObjectKind, ObjectTrait};
pub use page::{PagePattern, PageSettings};
pub use render::{CachedLayer, FrameTarget, LayerStats, Painter, SurfaceError};
pub use selection::{HandleKind, SelectionManager};
pub use tools::{ToolKind, ToolState};
