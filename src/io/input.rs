//! Input handling
//!
//! Wheel and touch movement go straight to the orbital controller as raw
//! pixel deltas. Keys map to [`ViewAction`] events that the transition
//! systems turn into sequences and store mutations.

use std::collections::HashMap;

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;

use crate::animation::orbital::OrbitalGestureController;
use crate::systems::sets::EngineSet;

/// Pixels per scrolled line for line-based wheels
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// User intents driven by the keyboard
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    CycleTheme,
    ToggleBounce,
    ToggleNoise,
    ToggleGrid,
    ToggleAlternateLogo,
    CycleSpeed,
    Exit,
}

pub fn map_key(key: KeyCode) -> Option<ViewAction> {
    match key {
        KeyCode::KeyT => Some(ViewAction::CycleTheme),
        KeyCode::KeyB => Some(ViewAction::ToggleBounce),
        KeyCode::KeyN => Some(ViewAction::ToggleNoise),
        KeyCode::KeyG => Some(ViewAction::ToggleGrid),
        KeyCode::KeyL => Some(ViewAction::ToggleAlternateLogo),
        KeyCode::KeyS => Some(ViewAction::CycleSpeed),
        KeyCode::Escape => Some(ViewAction::Exit),
        _ => None,
    }
}

/// Scroll amount in pixels, positive when scrolling down
pub fn wheel_delta_px(unit: MouseScrollUnit, y: f32) -> f64 {
    let amount = match unit {
        MouseScrollUnit::Line => f64::from(y) * LINE_HEIGHT_PX,
        MouseScrollUnit::Pixel => f64::from(y),
    };
    // Winit reports scrolling up as positive
    -amount
}

/// Last horizontal position of every active touch
#[derive(Resource, Debug, Default)]
pub struct TouchTracker {
    last_x: HashMap<u64, f32>,
}

impl TouchTracker {
    /// Horizontal movement since the touch's previous event
    pub fn track(&mut self, id: u64, phase: TouchPhase, x: f32) -> Option<f64> {
        match phase {
            TouchPhase::Started => {
                self.last_x.insert(id, x);
                None
            }
            TouchPhase::Moved => {
                let previous = self.last_x.insert(id, x)?;
                Some(f64::from(x - previous))
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                self.last_x.remove(&id);
                None
            }
        }
    }

    pub fn active_touches(&self) -> usize {
        self.last_x.len()
    }
}

fn read_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut actions: EventWriter<ViewAction>) {
    for key in keyboard.get_just_pressed() {
        if let Some(action) = map_key(*key) {
            debug!("Key {:?} -> {:?}", key, action);
            actions.write(action);
        }
    }
}

fn read_wheel(mut wheel: EventReader<MouseWheel>, mut orbital: ResMut<OrbitalGestureController>) {
    for event in wheel.read() {
        orbital.apply_wheel_delta(wheel_delta_px(event.unit, event.y));
    }
}

fn read_touch(
    mut touches: EventReader<TouchInput>,
    mut tracker: ResMut<TouchTracker>,
    mut orbital: ResMut<OrbitalGestureController>,
) {
    for touch in touches.read() {
        if let Some(delta_x) = tracker.track(touch.id, touch.phase, touch.position.x) {
            orbital.apply_touch_delta(delta_x);
        }
    }
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ViewAction>()
            .init_resource::<TouchTracker>()
            .add_systems(
                Update,
                (read_keyboard, read_wheel, read_touch).in_set(EngineSet::Input),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(map_key(KeyCode::KeyT), Some(ViewAction::CycleTheme));
        assert_eq!(map_key(KeyCode::KeyB), Some(ViewAction::ToggleBounce));
        assert_eq!(map_key(KeyCode::Escape), Some(ViewAction::Exit));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn wheel_lines_become_pixels() {
        assert_eq!(wheel_delta_px(MouseScrollUnit::Line, -1.0), 16.0);
        assert_eq!(wheel_delta_px(MouseScrollUnit::Pixel, 40.0), -40.0);
    }

    #[test]
    fn touch_deltas_follow_each_finger() {
        let mut tracker = TouchTracker::default();
        assert_eq!(tracker.track(1, TouchPhase::Started, 100.0), None);
        assert_eq!(tracker.track(2, TouchPhase::Started, 10.0), None);
        assert_eq!(tracker.track(1, TouchPhase::Moved, 130.0), Some(30.0));
        assert_eq!(tracker.track(2, TouchPhase::Moved, 0.0), Some(-10.0));
        assert_eq!(tracker.track(1, TouchPhase::Ended, 130.0), None);
        assert_eq!(tracker.active_touches(), 1);
        // A move for an unknown touch has no baseline
        assert_eq!(tracker.track(9, TouchPhase::Moved, 5.0), None);
    }
}
