//! Visual toggle flags
//!
//! Every flag always has a value; there is no "unset" state. Controls are
//! either on/off switches or a select cycling through a fixed set of
//! options, and both resolve to a single [`StoreAction`].

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::theme_store::StoreAction;

/// Boolean visual flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Noise,
    Grid,
    BounceMode,
    AlternateLogo,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::Noise, Flag::Grid, Flag::BounceMode, Flag::AlternateLogo];

    pub fn label(self) -> &'static str {
        match self {
            Flag::Noise => "noise",
            Flag::Grid => "grid",
            Flag::BounceMode => "bounce",
            Flag::AlternateLogo => "alternate logo",
        }
    }
}

/// Bounce speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpeedVariant {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedVariant {
    pub const ALL: [SpeedVariant; 3] = [SpeedVariant::Slow, SpeedVariant::Normal, SpeedVariant::Fast];

    /// Multiplier applied to the configured base speed
    pub fn factor(self) -> f64 {
        match self {
            SpeedVariant::Slow => 0.5,
            SpeedVariant::Normal => 1.0,
            SpeedVariant::Fast => 2.0,
        }
    }

    pub fn speed(self, base_px_per_sec: f64) -> f64 {
        base_px_per_sec * self.factor()
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub noise_enabled: bool,
    pub grid_enabled: bool,
    pub bounce_mode_active: bool,
    pub alternate_logo_enabled: bool,
    pub speed_variant: SpeedVariant,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            noise_enabled: true,
            grid_enabled: false,
            bounce_mode_active: false,
            alternate_logo_enabled: false,
            speed_variant: SpeedVariant::Normal,
        }
    }
}

impl ToggleState {
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Noise => self.noise_enabled,
            Flag::Grid => self.grid_enabled,
            Flag::BounceMode => self.bounce_mode_active,
            Flag::AlternateLogo => self.alternate_logo_enabled,
        }
    }

    /// Returns true when the value actually changed
    pub(crate) fn set_flag(&mut self, flag: Flag, value: bool) -> bool {
        let slot = match flag {
            Flag::Noise => &mut self.noise_enabled,
            Flag::Grid => &mut self.grid_enabled,
            Flag::BounceMode => &mut self.bounce_mode_active,
            Flag::AlternateLogo => &mut self.alternate_logo_enabled,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    pub(crate) fn set_speed_variant(&mut self, variant: SpeedVariant) -> bool {
        let changed = self.speed_variant != variant;
        self.speed_variant = variant;
        changed
    }
}

/// A user-facing control bound to one piece of toggle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleControl {
    Switch(Flag),
    Select(&'static [SpeedVariant]),
}

/// The controls exposed to the surrounding application
pub const CONTROLS: [ToggleControl; 5] = [
    ToggleControl::Switch(Flag::Noise),
    ToggleControl::Switch(Flag::Grid),
    ToggleControl::Switch(Flag::BounceMode),
    ToggleControl::Switch(Flag::AlternateLogo),
    ToggleControl::Select(&SpeedVariant::ALL),
];

impl ToggleControl {
    /// The action produced by activating this control once
    pub fn activate(&self, state: &ToggleState) -> StoreAction {
        match self {
            ToggleControl::Switch(flag) => StoreAction::SetFlag(*flag, !state.flag(*flag)),
            ToggleControl::Select(options) => {
                let current = options
                    .iter()
                    .position(|v| *v == state.speed_variant)
                    .unwrap_or(0);
                let next = options
                    .get((current + 1) % options.len().max(1))
                    .copied()
                    .unwrap_or(state.speed_variant);
                StoreAction::SetSpeed(next)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToggleControl::Switch(flag) => flag.label(),
            ToggleControl::Select(_) => "speed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_defines_every_flag() {
        let state = ToggleState::default();
        for flag in Flag::ALL {
            // total: every flag answers without panicking
            let _ = state.flag(flag);
        }
        assert!(state.noise_enabled);
        assert!(!state.bounce_mode_active);
        assert_eq!(state.speed_variant, SpeedVariant::Normal);
    }

    #[test]
    fn set_flag_reports_changes_only() {
        let mut state = ToggleState::default();
        assert!(state.set_flag(Flag::Grid, true));
        assert!(!state.set_flag(Flag::Grid, true));
        assert!(state.flag(Flag::Grid));
    }

    #[test]
    fn switch_control_inverts_its_flag() {
        let state = ToggleState::default();
        let action = ToggleControl::Switch(Flag::Noise).activate(&state);
        assert_eq!(action, StoreAction::SetFlag(Flag::Noise, false));
    }

    #[test]
    fn select_control_cycles_options() {
        let mut state = ToggleState::default();
        let control = ToggleControl::Select(&SpeedVariant::ALL);
        assert_eq!(control.activate(&state), StoreAction::SetSpeed(SpeedVariant::Fast));
        state.speed_variant = SpeedVariant::Fast;
        assert_eq!(control.activate(&state), StoreAction::SetSpeed(SpeedVariant::Slow));
    }

    #[test]
    fn speed_variants_scale_base_speed() {
        assert_eq!(SpeedVariant::Slow.speed(180.0), 90.0);
        assert_eq!(SpeedVariant::Normal.speed(180.0), 180.0);
        assert_eq!(SpeedVariant::Fast.speed(180.0), 360.0);
    }
}
