//! Plugin management and configuration for Ricochet
//!
//! Logging and window defaults for the Bevy host, plus the plugin bundling
//! the home view's systems.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;

use super::lifecycle::LifecyclePlugin;
use super::sets::EngineSetsPlugin;
use super::transitions::TransitionsPlugin;
use crate::core::config::{DEFAULT_WINDOW_SIZE, WINDOW_TITLE};

/// Configure logging with performance optimization for release builds
pub fn configure_logging() -> LogPlugin {
    #[cfg(debug_assertions)]
    {
        LogPlugin {
            level: Level::INFO,
            filter: "ricochet=debug,bevy_render=warn,bevy_winit=warn,wgpu=warn,winit=warn,bevy_ecs::error::handler=error".to_string(),
            ..default()
        }
    }

    #[cfg(not(debug_assertions))]
    {
        // Release builds: warnings and errors only
        LogPlugin {
            level: Level::WARN,
            filter: "ricochet=warn,bevy=warn,wgpu=error,winit=error,bevy_ecs::error::handler=error".to_string(),
            ..default()
        }
    }
}

/// Configure default Bevy plugins for the application
pub fn configure_default_plugins() -> bevy::app::PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.into(),
                resolution: DEFAULT_WINDOW_SIZE.into(),
                // Tell wasm to resize the window according to the available canvas
                fit_canvas_to_parent: true,
                // Tells wasm not to override default event handling, like F5, Ctrl+R etc.
                prevent_default_event_handling: false,
                ..default()
            }),
            ..default()
        })
        .set(configure_logging())
}

/// The home view: ordering, lifecycle and transitions
pub struct RicochetSystems;

impl Plugin for RicochetSystems {
    fn build(&self, app: &mut App) {
        app.add_plugins((EngineSetsPlugin, LifecyclePlugin, TransitionsPlugin));
    }
}
