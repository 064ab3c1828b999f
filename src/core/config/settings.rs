//! Resolved engine settings
//!
//! Built once at startup from the built-in defaults, the user config file
//! and the command line, in increasing priority.

use std::time::Duration;

use bevy::prelude::*;

use super::cli::CliArgs;
use super::user_config::ConfigFile;
use crate::animation::bounce::DEFAULT_TICK_RATE_HZ;
use crate::animation::orbital::{GestureTuning, ViewportClass};
use crate::core::state::{SpeedVariant, ToggleState};
use crate::ui::theme_system::ThemeKey;

pub const WINDOW_TITLE: &str = "Ricochet";
pub const DEFAULT_WINDOW_SIZE: Vec2 = Vec2::new(1024.0, 768.0);

/// Base bounce speed before the speed variant factor
pub const DEFAULT_BOUNCE_SPEED: f64 = 180.0;
pub const DEFAULT_ITEM_COUNT: usize = 8;
pub const DEFAULT_DESKTOP_RADIUS: f64 = 200.0;
pub const DEFAULT_MOBILE_RADIUS: f64 = 120.0;
pub const DEFAULT_SMOOTHING_MS: u64 = 250;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub theme: ThemeKey,
    pub toggles: ToggleState,
    pub bounce_speed: f64,
    pub tick_rate_hz: f64,
    pub gestures: GestureTuning,
    pub item_count: usize,
    pub desktop_radius: f64,
    pub mobile_radius: f64,
    pub starting_rotation_deg: f64,
    pub smoothing: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            theme: ThemeKey::default(),
            toggles: ToggleState::default(),
            bounce_speed: DEFAULT_BOUNCE_SPEED,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            gestures: GestureTuning::default(),
            item_count: DEFAULT_ITEM_COUNT,
            desktop_radius: DEFAULT_DESKTOP_RADIUS,
            mobile_radius: DEFAULT_MOBILE_RADIUS,
            starting_rotation_deg: 0.0,
            smoothing: Duration::from_millis(DEFAULT_SMOOTHING_MS),
        }
    }
}

impl EngineSettings {
    /// Layer the config file and the CLI over the defaults
    pub fn resolve(cli_args: &CliArgs, config: Option<&ConfigFile>) -> Self {
        let mut settings = Self::default();
        if let Some(config) = config {
            settings.apply_config(config);
        }
        settings.apply_cli(cli_args);
        settings
    }

    fn apply_config(&mut self, config: &ConfigFile) {
        if let Some(name) = &config.default_theme {
            match ThemeKey::parse(name) {
                Some(key) => self.theme = key,
                None => warn!("Ignoring unknown theme '{}' in settings.json", name),
            }
        }
        if let Some(speed) = config.bounce_speed.filter(|s| *s > 0.0) {
            self.bounce_speed = speed;
        }
        if let Some(rate) = config.tick_rate_hz.filter(|r| *r >= 1.0) {
            self.tick_rate_hz = rate;
        }
        if let Some(variant) = config.speed_variant {
            self.toggles.speed_variant = variant;
        }
        if let Some(noise) = config.noise_enabled {
            self.toggles.noise_enabled = noise;
        }
        if let Some(grid) = config.grid_enabled {
            self.toggles.grid_enabled = grid;
        }
        match config.item_count {
            Some(0) => warn!("Ignoring item_count 0 in settings.json"),
            Some(count) => self.item_count = count,
            None => {}
        }
        if let Some(radius) = config.desktop_radius.filter(|r| *r > 0.0) {
            self.desktop_radius = radius;
        }
        if let Some(radius) = config.mobile_radius.filter(|r| *r > 0.0) {
            self.mobile_radius = radius;
        }
        if let Some(rotation) = config.starting_rotation_deg {
            self.starting_rotation_deg = rotation;
        }
        if let Some(ms) = config.smoothing_ms {
            self.smoothing = Duration::from_millis(ms);
        }
        if let Some(gestures) = &config.gestures {
            if let Some(s) = gestures.wheel_sensitivity.filter(|s| *s > 0.0) {
                self.gestures.wheel_sensitivity = s;
            }
            if let Some(d) = gestures.wheel_direction {
                self.gestures.wheel_direction = d;
            }
            if let Some(s) = gestures.touch_sensitivity.filter(|s| *s > 0.0) {
                self.gestures.touch_sensitivity = s;
            }
            if let Some(d) = gestures.touch_direction {
                self.gestures.touch_direction = d;
            }
        }
    }

    fn apply_cli(&mut self, cli_args: &CliArgs) {
        if let Some(key) = cli_args.theme.as_deref().and_then(ThemeKey::parse) {
            debug!("Using theme from CLI: {}", key);
            self.theme = key;
        }
        if let Some(speed) = cli_args.speed {
            self.toggles.speed_variant = speed;
        }
        if let Some(count) = cli_args.items.filter(|n| *n > 0) {
            self.item_count = count;
        }
        if cli_args.bounce {
            self.toggles.bounce_mode_active = true;
        }
    }

    /// Bounce speed in px/s for the current speed variant
    pub fn bounce_speed_for(&self, variant: SpeedVariant) -> f64 {
        variant.speed(self.bounce_speed)
    }

    pub fn radius_for(&self, class: ViewportClass) -> f64 {
        match class {
            ViewportClass::Mobile => self.mobile_radius,
            ViewportClass::Desktop => self.desktop_radius,
        }
    }
}
