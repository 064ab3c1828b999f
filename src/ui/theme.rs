//! Theme colors for the Bevy scene
//!
//! The scene never reads theme definitions directly. It reads the custom
//! properties the store last wrote to the root style, so what is drawn is
//! always exactly one theme's batch.

use bevy::prelude::*;

use crate::core::state::RootStyle;
use crate::ui::theme_system::parse_hex_rgb;

/// Color roles a sprite can be tinted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    Foreground,
    Accent,
    Muted,
}

impl ColorRole {
    pub fn variable(self) -> &'static str {
        match self {
            ColorRole::Background => "--color-background",
            ColorRole::Foreground => "--color-foreground",
            ColorRole::Accent => "--color-accent",
            ColorRole::Muted => "--color-muted",
        }
    }
}

/// Role colors resolved from one root style revision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            foreground: Color::WHITE,
            accent: Color::WHITE,
            muted: Color::srgb(0.5, 0.5, 0.5),
        }
    }
}

impl ThemePalette {
    /// Read the role colors from the root; unreadable roles keep the fallback
    pub fn from_root(root: &RootStyle) -> Self {
        let fallback = Self::default();
        let read = |role: ColorRole, fallback: Color| {
            root.property(role.variable())
                .and_then(parse_hex_rgb)
                .map(|[r, g, b]| Color::srgb(r, g, b))
                .unwrap_or(fallback)
        };
        Self {
            background: read(ColorRole::Background, fallback.background),
            foreground: read(ColorRole::Foreground, fallback.foreground),
            accent: read(ColorRole::Accent, fallback.accent),
            muted: read(ColorRole::Muted, fallback.muted),
        }
    }

    pub fn role(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::Background => self.background,
            ColorRole::Foreground => self.foreground,
            ColorRole::Accent => self.accent,
            ColorRole::Muted => self.muted,
        }
    }
}
