//! Theme system infrastructure
//!
//! Theme definitions are JSON documents embedded at build time (see
//! ../themes/) and optionally overridden from the user config directory.
//! This module parses them into a [`ThemeRegistry`] keyed by [`ThemeKey`].

pub mod core;
pub mod embedded_themes;
pub mod json_theme;

// Re-export commonly used items
pub use core::{ThemeKey, ThemeRegistry};
pub use json_theme::{parse_hex_rgb, ThemeDefinition, META_COLOR_NAMES, THEME_VARIABLES};
