//! Application builder and initialization
//!
//! This module provides the main app creation functions

use std::path::Path;

use super::plugins::{CorePluginGroup, RenderingPluginGroup};
use crate::animation::bounce::BounceSimulator;
use crate::animation::orbital::OrbitalGestureController;
use crate::core::config::{CliArgs, ConfigFile, EngineSettings};
use crate::core::state::ThemeStateStore;
use crate::rendering::document::SceneDocument;
use crate::systems::{configure_default_plugins, create_startup_layout, start_views, Viewport};
use crate::ui::theme::ThemePalette;
use crate::ui::theme_system::ThemeRegistry;
use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::winit::WinitSettings;

/// Creates a fully configured Ricochet application.
///
/// Settings are resolved from the user config file and the CLI, the theme
/// registry is loaded (with user overrides when present), and every engine
/// resource is inserted before the window opens.
pub fn create_app(cli_args: CliArgs) -> Result<App> {
    #[cfg(not(target_arch = "wasm32"))]
    cli_args
        .validate()
        .map_err(|e| anyhow::anyhow!("CLI validation failed: {}", e))?;

    #[cfg(not(target_arch = "wasm32"))]
    let config = ConfigFile::load();
    #[cfg(target_arch = "wasm32")]
    let config: Option<ConfigFile> = None;

    let settings = EngineSettings::resolve(&cli_args, config.as_ref());

    let mut app = App::new();
    configure_resources(&mut app, cli_args, settings)?;
    configure_window_plugins(&mut app);
    add_engine_systems(&mut app);
    Ok(app)
}

/// Build the theme store for `settings`.
///
/// JSON files in `themes_dir` override the embedded themes when the
/// directory exists.
pub fn build_theme_store(settings: &EngineSettings, themes_dir: Option<&Path>) -> Result<ThemeStateStore> {
    let registry = match themes_dir {
        Some(dir) if dir.is_dir() => ThemeRegistry::with_user_overrides(dir)
            .with_context(|| format!("failed to load themes from {}", dir.display()))?,
        _ => ThemeRegistry::embedded().context("embedded themes are invalid")?,
    };
    Ok(ThemeStateStore::new(registry, settings.theme).with_toggles(settings.toggles))
}

/// Sets up application resources and configuration
fn configure_resources(app: &mut App, cli_args: CliArgs, settings: EngineSettings) -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    let themes_dir = Some(ConfigFile::config_dir().join("themes"));
    #[cfg(target_arch = "wasm32")]
    let themes_dir: Option<std::path::PathBuf> = None;

    let store = build_theme_store(&settings, themes_dir.as_deref())?;
    app.insert_resource(cli_args);
    insert_engine_resources(app, settings, store);

    // Keep both clocks running while the window is unfocused
    app.insert_resource(WinitSettings::game());
    Ok(())
}

/// Insert the simulators, the store and the document
pub fn insert_engine_resources(app: &mut App, settings: EngineSettings, store: ThemeStateStore) {
    let background = ThemePalette::from_root(store.root()).background;
    app.insert_resource(ClearColor(background))
        .insert_resource(BounceSimulator::new(settings.tick_rate_hz))
        .insert_resource(OrbitalGestureController::new(settings.gestures, settings.smoothing))
        .insert_resource(Time::<Fixed>::from_hz(settings.tick_rate_hz))
        .insert_resource(store)
        .insert_resource(settings)
        .init_resource::<SceneDocument>()
        .init_resource::<Viewport>();
}

/// Configure window and default plugins
fn configure_window_plugins(app: &mut App) {
    app.add_plugins(configure_default_plugins());
}

/// Add the engine's plugin groups and startup systems
pub fn add_engine_systems(app: &mut App) {
    debug!("Adding plugin groups...");
    app.add_plugins((CorePluginGroup, RenderingPluginGroup))
        .add_systems(Startup, (create_startup_layout, start_views).chain());
    debug!("All plugin groups added successfully");
}
