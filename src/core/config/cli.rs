//! Command line interface for ricochet
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs.

use crate::core::state::SpeedVariant;
use crate::ui::theme_system::ThemeKey;
use bevy::prelude::*;
use clap::Parser;

/// Ricochet CLI arguments
///
/// Examples:
///   ricochet                          # Start with settings.json or defaults
///   ricochet --theme water            # Use the water theme
///   ricochet --bounce --speed fast    # Start in bounce mode, fast
///   ricochet --items 12               # Twelve items on the orbit
///   ricochet --new-config             # Write ~/.config/ricochet and exit
#[derive(Parser, Debug, Resource, Clone, Default)]
#[clap(
    name = "ricochet",
    version,
    about = "A bouncing logo, an orbit of items and a handful of themes",
    long_about = "Ricochet animates a logo that bounces off the window edges, a ring of items you spin with the mouse wheel or touch, and a set of switchable visual themes."
)]
pub struct CliArgs {
    /// Theme to use
    ///
    /// Available themes: slime (default), water, acid, bunny, dune.
    #[clap(
        long = "theme",
        short = 't',
        help = "Theme to use",
        long_help = "Theme to use. Available themes: slime (default), water, acid, bunny, dune"
    )]
    pub theme: Option<String>,

    /// Start in bounce mode instead of the orbit
    #[clap(long = "bounce", short = 'b', help = "Start in bounce mode")]
    pub bounce: bool,

    /// Bounce speed preset
    #[clap(long = "speed", value_enum, help = "Bounce speed preset")]
    pub speed: Option<SpeedVariant>,

    /// Number of items on the orbit
    #[clap(long = "items", short = 'n', help = "Number of items on the orbit")]
    pub items: Option<usize>,

    /// Initialize user configuration directory with settings and themes
    ///
    /// This creates the ~/.config/ricochet directory with:
    /// - settings.json: default theme, speeds, gesture tuning
    /// - themes/: Copies of all default themes that you can customize
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with settings and themes",
        long_help = "Initialize the ~/.config/ricochet directory with a settings.json file and copies of all default themes, then exit."
    )]
    pub new_config: bool,

    /// Write logs to ~/.config/ricochet/logs instead of the terminal
    #[clap(long = "log-file", help = "Redirect logs to ~/.config/ricochet/logs")]
    pub log_file: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    pub fn validate(&self) -> Result<(), String> {
        if let Some(theme_name) = &self.theme {
            if ThemeKey::parse(theme_name).is_none() {
                let available_themes = ThemeKey::all_names().join(", ");
                return Err(format!(
                    "Unknown theme: '{theme_name}'\nAvailable themes: {available_themes}"
                ));
            }
        }

        if self.items == Some(0) {
            return Err("The orbit needs at least one item (--items)".to_string());
        }

        Ok(())
    }

    /// Create default CLI args for web builds
    #[cfg(target_arch = "wasm32")]
    pub fn default_for_web() -> Self {
        Self::default()
    }
}
