//! Theme keys and the theme registry
//!
//! The set of themes is closed: every [`ThemeKey`] has exactly one
//! definition in a [`ThemeRegistry`], so looking a theme up can never fail
//! once the registry has been built.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::embedded_themes;
use super::json_theme::ThemeDefinition;

/// The available visual themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKey {
    #[default]
    Slime,
    Water,
    Acid,
    Bunny,
    Dune,
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 5] = [
        ThemeKey::Slime,
        ThemeKey::Water,
        ThemeKey::Acid,
        ThemeKey::Bunny,
        ThemeKey::Dune,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeKey::Slime => "slime",
            ThemeKey::Water => "water",
            ThemeKey::Acid => "acid",
            ThemeKey::Bunny => "bunny",
            ThemeKey::Dune => "dune",
        }
    }

    /// Parse a theme name, case-insensitively
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    pub fn all_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|key| key.name()).collect()
    }

    /// The theme after this one, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|key| *key == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable mapping from every theme key to its definition
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<ThemeKey, ThemeDefinition>,
}

impl ThemeRegistry {
    /// Build the registry from the themes compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_sources(
            ThemeKey::ALL
                .into_iter()
                .map(|key| (key, embedded_themes::embedded_theme_json(key).to_string())),
        )
    }

    /// Build the registry, letting JSON files in `user_dir` override the
    /// embedded definitions (`<user_dir>/<theme>.json`)
    pub fn with_user_overrides(user_dir: &Path) -> Result<Self> {
        let mut sources = Vec::with_capacity(ThemeKey::ALL.len());
        for key in ThemeKey::ALL {
            let path = user_dir.join(format!("{}.json", key.name()));
            let content = if path.exists() {
                debug!("Loading user theme override from {:?}", path);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read theme file {}", path.display()))?
            } else {
                embedded_themes::embedded_theme_json(key).to_string()
            };
            sources.push((key, content));
        }
        Self::from_sources(sources)
    }

    /// Build a registry from raw JSON documents; every key must be present
    pub fn from_sources(sources: impl IntoIterator<Item = (ThemeKey, String)>) -> Result<Self> {
        let mut themes = HashMap::new();
        for (key, content) in sources {
            let definition = ThemeDefinition::from_json(&content)
                .with_context(|| format!("invalid definition for theme '{key}'"))?;
            themes.insert(key, definition);
        }

        if let Some(missing) = ThemeKey::ALL.iter().find(|key| !themes.contains_key(key)) {
            return Err(anyhow!("theme registry is missing '{missing}'"));
        }

        Ok(Self { themes })
    }

    pub fn get(&self, key: ThemeKey) -> &ThemeDefinition {
        // from_sources rejects incomplete registries
        &self.themes[&key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_name_case_insensitively() {
        for key in ThemeKey::ALL {
            assert_eq!(ThemeKey::parse(key.name()), Some(key));
            assert_eq!(ThemeKey::parse(&key.name().to_uppercase()), Some(key));
        }
        assert_eq!(ThemeKey::parse("neon"), None);
        assert_eq!(ThemeKey::parse(""), None);
    }

    #[test]
    fn next_cycles_through_all_themes() {
        let mut key = ThemeKey::Slime;
        let mut seen = Vec::new();
        for _ in 0..ThemeKey::ALL.len() {
            seen.push(key);
            key = key.next();
        }
        assert_eq!(key, ThemeKey::Slime);
        assert_eq!(seen, ThemeKey::ALL.to_vec());
    }

    #[test]
    fn embedded_registry_is_complete() {
        let registry = ThemeRegistry::embedded().expect("embedded themes should parse");
        for key in ThemeKey::ALL {
            assert!(!registry.get(key).name.is_empty());
        }
        assert_eq!(registry.get(ThemeKey::Water).name, "Water");
    }

    #[test]
    fn incomplete_registry_is_rejected() {
        let sources = vec![(
            ThemeKey::Slime,
            embedded_themes::embedded_theme_json(ThemeKey::Slime).to_string(),
        )];
        assert!(ThemeRegistry::from_sources(sources).is_err());
    }

    #[test]
    fn user_override_replaces_embedded_definition() {
        let dir = tempfile::tempdir().unwrap();
        let custom = embedded_themes::embedded_theme_json(ThemeKey::Dune)
            .replace("\"Dune\"", "\"Desert\"");
        std::fs::write(dir.path().join("dune.json"), custom).unwrap();

        let registry = ThemeRegistry::with_user_overrides(dir.path()).unwrap();
        assert_eq!(registry.get(ThemeKey::Dune).name, "Desert");
        assert_eq!(registry.get(ThemeKey::Acid).name, "Acid");
    }
}
