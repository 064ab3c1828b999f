//! Theme handling for Ricochet

pub mod theme;
pub mod theme_system;

// Re-export commonly used items
pub use theme::{ColorRole, ThemePalette};
