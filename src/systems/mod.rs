//! Bevy Systems and Plugins
//!
//! This module contains the Bevy side of the engine:
//! - Frame ordering and plugin configuration
//! - Startup layout and the home view lifecycle
//! - Transition scheduling for user actions

pub mod lifecycle;
pub mod mailbox;
pub mod plugins;
pub mod sets;
pub mod startup_layout;
pub mod transitions;

// Re-export commonly used items
pub use lifecycle::{start_views, LifecyclePlugin};
pub use mailbox::Mailbox;
pub use plugins::{configure_default_plugins, RicochetSystems};
pub use sets::{EngineSet, EngineSetsPlugin};
pub use startup_layout::{create_startup_layout, Viewport};
pub use transitions::{Transitions, TransitionsPlugin, HOME};
