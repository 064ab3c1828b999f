use std::path::PathBuf;

use super::core::ThemeKey;

pub const SLIME_JSON: &str = include_str!("../themes/slime.json");
pub const WATER_JSON: &str = include_str!("../themes/water.json");
pub const ACID_JSON: &str = include_str!("../themes/acid.json");
pub const BUNNY_JSON: &str = include_str!("../themes/bunny.json");
pub const DUNE_JSON: &str = include_str!("../themes/dune.json");

pub fn embedded_theme_json(key: ThemeKey) -> &'static str {
    match key {
        ThemeKey::Slime => SLIME_JSON,
        ThemeKey::Water => WATER_JSON,
        ThemeKey::Acid => ACID_JSON,
        ThemeKey::Bunny => BUNNY_JSON,
        ThemeKey::Dune => DUNE_JSON,
    }
}

pub fn get_embedded_themes() -> Vec<(ThemeKey, &'static str)> {
    ThemeKey::ALL
        .into_iter()
        .map(|key| (key, embedded_theme_json(key)))
        .collect()
}

pub fn get_user_themes_dir() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    config_dir.join("ricochet").join("themes")
}

pub fn user_themes_dir_exists() -> bool {
    get_user_themes_dir().exists()
}
