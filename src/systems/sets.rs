//! Frame ordering for the engine systems
//!
//! Within one display frame input is read first, then actions schedule
//! transitions, transitions advance (running any commits), the view
//! reacts to committed store changes, animations step, and finally the
//! document is mirrored onto the scene.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum EngineSet {
    /// Read window, keyboard, wheel and touch events
    Input,
    /// Turn view actions into sequences and store mutations
    Actions,
    /// Advance transition sequences
    Transitions,
    /// React to committed store changes
    React,
    /// Step the orbital filter and apply pending placements
    Animate,
    /// Mirror the document onto sprites and transforms
    Sync,
}

pub struct EngineSetsPlugin;

impl Plugin for EngineSetsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                EngineSet::Input,
                EngineSet::Actions,
                EngineSet::Transitions,
                EngineSet::React,
                EngineSet::Animate,
                EngineSet::Sync,
            )
                .chain(),
        );
    }
}
