//! User configuration file handling
//!
//! Manages settings from ~/.config/ricochet/settings.json

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::animation::orbital::Direction;
use crate::core::state::SpeedVariant;

/// Per-source gesture overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    pub wheel_sensitivity: Option<f64>,
    pub wheel_direction: Option<Direction>,
    pub touch_sensitivity: Option<f64>,
    pub touch_direction: Option<Direction>,
}

/// User configuration from ~/.config/ricochet/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments.
/// Every field is optional; missing fields keep the built-in value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    /// Default theme to use (e.g., "slime", "water", "dune")
    pub default_theme: Option<String>,
    /// Base bounce speed in pixels per second
    pub bounce_speed: Option<f64>,
    pub speed_variant: Option<SpeedVariant>,
    /// Rate of the fixed-interval bounce clock
    pub tick_rate_hz: Option<f64>,
    pub noise_enabled: Option<bool>,
    pub grid_enabled: Option<bool>,
    /// Number of items on the orbit
    pub item_count: Option<usize>,
    pub desktop_radius: Option<f64>,
    pub mobile_radius: Option<f64>,
    pub starting_rotation_deg: Option<f64>,
    /// How long the rendered orbit rotation takes to catch up with input
    pub smoothing_ms: Option<u64>,
    pub gestures: Option<GestureConfig>,
}

impl ConfigFile {
    /// Get the path to the ricochet config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("ricochet")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> Option<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    debug!("Loaded user settings from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// The settings file written by `--new-config`
    pub fn starter() -> Self {
        Self {
            default_theme: Some("slime".to_string()),
            bounce_speed: Some(crate::core::config::settings::DEFAULT_BOUNCE_SPEED),
            speed_variant: Some(SpeedVariant::Normal),
            item_count: Some(crate::core::config::settings::DEFAULT_ITEM_COUNT),
            smoothing_ms: Some(crate::core::config::settings::DEFAULT_SMOOTHING_MS),
            ..Default::default()
        }
    }

    /// Initialize the complete user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/ricochet directory structure
    /// 2. A settings.json file with default values
    /// 3. A themes/ directory with copies of all embedded themes
    /// 4. A logs/ directory for application logs
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        Self::initialize_config_directory_at(&Self::config_dir())
    }

    pub fn initialize_config_directory_at(config_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = config_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = config_dir.join("settings.json");
        if !settings_path.exists() {
            Self::starter().save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        // Copy all embedded themes to the user directory
        let themes_dir = config_dir.join("themes");
        fs::create_dir_all(&themes_dir)?;
        println!("Created themes directory: {:?}", themes_dir);

        use crate::ui::theme_system::embedded_themes;
        for (key, content) in embedded_themes::get_embedded_themes() {
            let theme_path = themes_dir.join(format!("{}.json", key.name()));
            if !theme_path.exists() {
                fs::write(&theme_path, content)?;
                println!("  - Copied theme: {}.json", key.name());
            } else {
                println!("  - Theme already exists: {}.json", key.name());
            }
        }

        println!("\nConfiguration initialized successfully!");
        println!("You can now:");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - Customize themes in: {:?}", themes_dir);
        println!("  - View application logs in: {:?}", logs_dir);

        Ok(())
    }
}
