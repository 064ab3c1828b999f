pub mod input;

// Explicit re-exports for public API
pub use input::{map_key, wheel_delta_px, InputPlugin, TouchTracker, ViewAction};
