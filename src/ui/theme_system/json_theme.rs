//! JSON theme definitions
//!
//! Each theme is a small JSON document naming its color roles, a shadow
//! definition and two asset references. A definition expands into the
//! fixed set of custom properties written to the document root.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Custom property names, in the order they are written
pub const THEME_VARIABLES: [&str; 7] = [
    "--color-background",
    "--color-foreground",
    "--color-accent",
    "--color-muted",
    "--shadow",
    "--background-image",
    "--noise-image",
];

/// Meta attributes that follow the background role
pub const META_COLOR_NAMES: [&str; 2] = ["theme-color", "status-bar-color"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: String,
    pub foreground: String,
    pub accent: String,
    pub muted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAssets {
    pub background: String,
    pub noise: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,
    pub colors: ThemeColors,
    pub shadow: String,
    pub assets: ThemeAssets,
}

impl ThemeDefinition {
    pub fn from_json(content: &str) -> Result<Self> {
        let definition: ThemeDefinition = serde_json::from_str(content)?;
        definition.validate()?;
        Ok(definition)
    }

    fn validate(&self) -> Result<()> {
        let colors = [
            ("background", &self.colors.background),
            ("foreground", &self.colors.foreground),
            ("accent", &self.colors.accent),
            ("muted", &self.colors.muted),
        ];
        for (role, value) in colors {
            if parse_hex_rgb(value).is_none() {
                return Err(anyhow!("color role '{role}' is not a #rrggbb value: {value}"));
            }
        }
        Ok(())
    }

    /// The full variable set for this theme, in [`THEME_VARIABLES`] order
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.colors.background.clone(),
            self.colors.foreground.clone(),
            self.colors.accent.clone(),
            self.colors.muted.clone(),
            self.shadow.clone(),
            format!("url({})", self.assets.background),
            format!("url({})", self.assets.noise),
        ];
        THEME_VARIABLES.into_iter().zip(values).collect()
    }

    /// Meta attribute values derived from the background role
    pub fn meta_colors(&self) -> Vec<(&'static str, String)> {
        META_COLOR_NAMES
            .into_iter()
            .map(|name| (name, self.colors.background.clone()))
            .collect()
    }
}

/// Parse `#rrggbb` into 0..=1 sRGB components
pub fn parse_hex_rgb(value: &str) -> Option<[f32; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|byte| byte as f32 / 255.0)
    };
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "name": "Sample",
        "colors": { "background": "#000000", "foreground": "#ffffff", "accent": "#ff0000", "muted": "#808080" },
        "shadow": "none",
        "assets": { "background": "/bg.webp", "noise": "/noise.png" }
    }"##;

    #[test]
    fn variables_cover_every_registered_name_once() {
        let definition = ThemeDefinition::from_json(SAMPLE).unwrap();
        let variables = definition.variables();
        let names: Vec<_> = variables.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, THEME_VARIABLES.to_vec());
        assert_eq!(variables[5].1, "url(/bg.webp)");
    }

    #[test]
    fn meta_colors_follow_background() {
        let definition = ThemeDefinition::from_json(SAMPLE).unwrap();
        for (_, value) in definition.meta_colors() {
            assert_eq!(value, "#000000");
        }
    }

    #[test]
    fn invalid_color_is_rejected() {
        let broken = SAMPLE.replace("#ff0000", "red");
        assert!(ThemeDefinition::from_json(&broken).is_err());
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_rgb("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(parse_hex_rgb("ff0000"), None);
        assert_eq!(parse_hex_rgb("#ff00"), None);
        assert_eq!(parse_hex_rgb("#gg0000"), None);
    }
}
