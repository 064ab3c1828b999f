//! Rendering
//!
//! The presentation surface the engine writes to, and the systems that
//! mirror it onto the Bevy scene.

pub mod document;
pub mod scene_sync;

// Re-export commonly used items
pub use document::{Placement, PresentationSurface, SceneDocument, StyleProperty, TargetId};
pub use scene_sync::{SceneSyncPlugin, ScenePalette};
