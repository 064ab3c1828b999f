//! Plugin group definitions for the Ricochet application
//!
//! Organized into logical groups for clarity and maintainability

use bevy::app::{PluginGroup, PluginGroupBuilder};

/// Plugin group for core application functionality
#[derive(Default)]
pub struct CorePluginGroup;

impl PluginGroup for CorePluginGroup {
    fn build(self) -> PluginGroupBuilder {
        use crate::io::input::InputPlugin;
        use crate::systems::RicochetSystems;

        PluginGroupBuilder::start::<Self>()
            .add(RicochetSystems) // Configures the EngineSet ordering
            .add(InputPlugin)
    }
}

/// Plugin group for rendering functionality
#[derive(Default)]
pub struct RenderingPluginGroup;

impl PluginGroup for RenderingPluginGroup {
    fn build(self) -> PluginGroupBuilder {
        use crate::rendering::SceneSyncPlugin;

        PluginGroupBuilder::start::<Self>().add(SceneSyncPlugin)
    }
}
