//! Visual state changes
//!
//! Every user-visible state change runs as a hide-then-reveal sequence:
//! the outgoing elements fade out, the store mutation commits, and the
//! incoming elements fade in. Theme changes crossfade through the veil, a
//! full-screen layer in the background color.

use bevy::prelude::*;

use super::sets::EngineSet;
use super::startup_layout::{GRID, LOGO, NOISE, ORBIT, VEIL};
use crate::animation::easing::Easing;
use crate::animation::orchestrator::{Commit, Orchestrator, SequenceEvent, SequenceHandle, SequenceStatus, ViewId};
use crate::animation::timeline::Step;
use crate::core::state::{Flag, ThemeStateStore, ToggleState};
use crate::io::input::ViewAction;
use crate::rendering::document::{SceneDocument, StyleProperty};
use crate::ui::theme_system::ThemeKey;

/// The view every home-screen sequence belongs to
pub const HOME: ViewId = ViewId("home");

const HIDE_MS: u64 = 300;
const REVEAL_MS: u64 = 450;
const VEIL_IN_MS: u64 = 250;
const VEIL_OUT_MS: u64 = 350;
const HIDDEN_BLUR_PX: f64 = 8.0;
const HIDDEN_SCALE: f64 = 0.85;

#[derive(Resource, Default)]
pub struct Transitions {
    pub orchestrator: Orchestrator<ThemeStateStore>,
    /// The most recent state-changing sequence
    last: Option<SequenceHandle>,
}

/// Fade, blur and shrink `target` out
fn hide(target: &str) -> Step {
    Step::to([target])
        .set(StyleProperty::Opacity, 0.0)
        .set(StyleProperty::Blur, HIDDEN_BLUR_PX)
        .set(StyleProperty::Scale, HIDDEN_SCALE)
        .millis(HIDE_MS)
        .ease(Easing::PowerIn(2))
}

/// Bring `target` back to its resting style
fn reveal(target: &str) -> Step {
    Step::to([target])
        .set(StyleProperty::Opacity, 1.0)
        .set(StyleProperty::Blur, 0.0)
        .set(StyleProperty::Scale, 1.0)
        .millis(REVEAL_MS)
        .ease(Easing::PowerOut(3))
}

fn fade(target: &str, opacity: f64) -> Step {
    Step::to([target])
        .set(StyleProperty::Opacity, opacity)
        .millis(HIDE_MS)
        .ease(Easing::PowerInOut(1))
}

/// Hide, commit and reveal steps for one action
pub struct Plan {
    pub hide: Vec<Step>,
    pub commit: Commit<ThemeStateStore>,
    pub reveal: Vec<Step>,
}

impl Plan {
    fn new(hide: Vec<Step>, commit: Commit<ThemeStateStore>, reveal: Vec<Step>) -> Self {
        Self { hide, commit, reveal }
    }
}

pub fn theme_crossfade(next: ThemeKey) -> Plan {
    Plan::new(
        vec![Step::to([VEIL])
            .set(StyleProperty::Opacity, 1.0)
            .millis(VEIL_IN_MS)
            .ease(Easing::PowerIn(1))],
        Box::new(move |store: &mut ThemeStateStore| {
            store.set_theme(next);
        }),
        vec![Step::to([VEIL])
            .set(StyleProperty::Opacity, 0.0)
            .millis(VEIL_OUT_MS)
            .ease(Easing::PowerOut(1))],
    )
}

/// Swap the orbit for the bouncing logo, or back
pub fn bounce_switch(enter: bool) -> Plan {
    let (outgoing, incoming) = if enter { (ORBIT, LOGO) } else { (LOGO, ORBIT) };
    Plan::new(
        vec![hide(outgoing)],
        Box::new(move |store: &mut ThemeStateStore| {
            store.set_flag(Flag::BounceMode, enter);
        }),
        vec![reveal(incoming)],
    )
}

/// Noise and grid fade in after the flag is set and out before it clears
pub fn overlay_switch(flag: Flag, enable: bool) -> Plan {
    let target = if flag == Flag::Grid { GRID } else { NOISE };
    let commit: Commit<ThemeStateStore> = Box::new(move |store: &mut ThemeStateStore| {
        store.set_flag(flag, enable);
    });
    if enable {
        Plan::new(Vec::new(), commit, vec![fade(target, 1.0)])
    } else {
        Plan::new(vec![fade(target, 0.0)], commit, Vec::new())
    }
}

/// Swap the logo's colors; only animated while the logo is on screen
pub fn alternate_logo_swap(enable: bool, logo_visible: bool) -> Plan {
    let commit: Commit<ThemeStateStore> = Box::new(move |store: &mut ThemeStateStore| {
        store.set_flag(Flag::AlternateLogo, enable);
    });
    if logo_visible {
        Plan::new(vec![hide(LOGO)], commit, vec![reveal(LOGO)])
    } else {
        Plan::new(Vec::new(), commit, Vec::new())
    }
}

/// The plan for an action that changes visual state, if it does
pub fn plan_for(action: ViewAction, active_theme: ThemeKey, toggles: &ToggleState) -> Option<Plan> {
    let plan = match action {
        ViewAction::CycleTheme => theme_crossfade(active_theme.next()),
        ViewAction::ToggleBounce => bounce_switch(!toggles.bounce_mode_active),
        ViewAction::ToggleNoise => overlay_switch(Flag::Noise, !toggles.noise_enabled),
        ViewAction::ToggleGrid => overlay_switch(Flag::Grid, !toggles.grid_enabled),
        ViewAction::ToggleAlternateLogo => {
            alternate_logo_swap(!toggles.alternate_logo_enabled, toggles.bounce_mode_active)
        }
        ViewAction::CycleSpeed | ViewAction::Exit => return None,
    };
    Some(plan)
}

impl Transitions {
    /// Start the plan for `action`. A still-running previous plan is
    /// finished first so its commit is never lost.
    pub fn schedule(
        &mut self,
        action: ViewAction,
        document: &mut SceneDocument,
        store: &mut ThemeStateStore,
    ) -> Option<SequenceHandle> {
        if let Some(previous) = self.last.take() {
            if self.orchestrator.status(previous) == Some(SequenceStatus::Running) {
                self.orchestrator.cancel_and_finish(previous, document, store);
            }
        }
        // Plan against the state the finished sequence left behind
        let plan = plan_for(action, store.active_theme(), store.toggles())?;
        let handle = self
            .orchestrator
            .hide_then_reveal(HOME, plan.hide, plan.commit, plan.reveal);
        self.last = Some(handle);
        Some(handle)
    }
}

fn handle_view_actions(
    mut actions: EventReader<ViewAction>,
    mut transitions: ResMut<Transitions>,
    mut document: ResMut<SceneDocument>,
    mut store: ResMut<ThemeStateStore>,
    mut exit: EventWriter<AppExit>,
) {
    for action in actions.read() {
        match action {
            ViewAction::CycleSpeed => {
                let next = store.toggles().speed_variant.next();
                store.set_speed_variant(next);
            }
            ViewAction::Exit => {
                info!("Exit requested");
                exit.write(AppExit::Success);
            }
            _ => {
                if let Some(handle) = transitions.schedule(*action, &mut document, &mut store) {
                    debug!("{:?} scheduled as sequence {}", action, handle);
                }
            }
        }
    }
}

fn advance_transitions(
    real: Res<Time<Real>>,
    mut transitions: ResMut<Transitions>,
    mut document: ResMut<SceneDocument>,
    mut store: ResMut<ThemeStateStore>,
) {
    if transitions.orchestrator.is_idle() {
        return;
    }
    let events = transitions
        .orchestrator
        .advance(real.elapsed(), &mut *document, &mut *store);
    for event in events {
        if let SequenceEvent::Abandoned { handle, error } = event {
            // The view keeps its previous state
            debug!("Sequence {} left the view unchanged: {}", handle, error);
        }
    }
}

pub struct TransitionsPlugin;

impl Plugin for TransitionsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Transitions>()
            .add_systems(Update, handle_view_actions.in_set(EngineSet::Actions))
            .add_systems(Update, advance_transitions.in_set(EngineSet::Transitions));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::document::{ElementStyle, PresentationSurface, TargetId};
    use crate::ui::theme_system::ThemeRegistry;
    use std::time::Duration;

    fn home() -> (SceneDocument, ThemeStateStore) {
        let mut document = SceneDocument::default();
        for target in [NOISE, GRID, ORBIT, VEIL] {
            document.mount(target, ElementStyle::default());
        }
        document.mount(LOGO, ElementStyle::hidden());
        document.mount(VEIL, ElementStyle::hidden());
        document.mount(GRID, ElementStyle::hidden());
        let store = ThemeStateStore::new(ThemeRegistry::embedded().unwrap(), ThemeKey::Slime);
        (document, store)
    }

    fn opacity(document: &SceneDocument, target: &str) -> f64 {
        document.read_style(&TargetId::from(target), StyleProperty::Opacity).unwrap()
    }

    fn run_to_end(transitions: &mut Transitions, document: &mut SceneDocument, store: &mut ThemeStateStore) {
        let mut now = Duration::ZERO;
        while !transitions.orchestrator.is_idle() {
            transitions.orchestrator.advance(now, document, store);
            now += Duration::from_millis(16);
            assert!(now < Duration::from_secs(5));
        }
    }

    #[test]
    fn bounce_toggle_hides_orbit_before_committing() {
        let (mut document, mut store) = home();
        let mut transitions = Transitions::default();
        transitions.schedule(ViewAction::ToggleBounce, &mut document, &mut store);

        transitions.orchestrator.advance(Duration::ZERO, &mut document, &mut store);
        transitions
            .orchestrator
            .advance(Duration::from_millis(150), &mut document, &mut store);
        assert!(!store.toggles().bounce_mode_active);
        assert!(opacity(&document, ORBIT) < 1.0);

        run_to_end(&mut transitions, &mut document, &mut store);
        assert!(store.toggles().bounce_mode_active);
        assert_eq!(opacity(&document, ORBIT), 0.0);
        assert_eq!(opacity(&document, LOGO), 1.0);
    }

    #[test]
    fn theme_cycle_crossfades_through_the_veil() {
        let (mut document, mut store) = home();
        let mut transitions = Transitions::default();
        transitions.schedule(ViewAction::CycleTheme, &mut document, &mut store);

        let mut now = Duration::ZERO;
        let mut peak: f64 = 0.0;
        while store.active_theme() == ThemeKey::Slime {
            transitions.orchestrator.advance(now, &mut document, &mut store);
            peak = peak.max(opacity(&document, VEIL));
            now += Duration::from_millis(16);
        }
        // The palette only swapped once the veil fully covered the scene
        assert_eq!(peak, 1.0);
        assert_eq!(store.active_theme(), ThemeKey::Slime.next());

        run_to_end(&mut transitions, &mut document, &mut store);
        assert_eq!(opacity(&document, VEIL), 0.0);
    }

    #[test]
    fn a_new_action_finishes_the_previous_one() {
        let (mut document, mut store) = home();
        let mut transitions = Transitions::default();
        let first = transitions
            .schedule(ViewAction::ToggleBounce, &mut document, &mut store)
            .unwrap();
        transitions.orchestrator.advance(Duration::ZERO, &mut document, &mut store);

        transitions.schedule(ViewAction::ToggleBounce, &mut document, &mut store);
        assert_eq!(transitions.orchestrator.status(first), Some(SequenceStatus::Completed));
        // The first toggle committed, so the second one plans a return to the orbit
        assert!(store.toggles().bounce_mode_active);

        run_to_end(&mut transitions, &mut document, &mut store);
        assert!(!store.toggles().bounce_mode_active);
        assert_eq!(opacity(&document, ORBIT), 1.0);
    }

    #[test]
    fn overlays_fade_around_the_flag() {
        let (mut document, mut store) = home();
        let mut transitions = Transitions::default();

        transitions.schedule(ViewAction::ToggleGrid, &mut document, &mut store);
        transitions.orchestrator.advance(Duration::ZERO, &mut document, &mut store);
        // Turning on commits first
        assert!(store.toggles().grid_enabled);
        run_to_end(&mut transitions, &mut document, &mut store);
        assert_eq!(opacity(&document, GRID), 1.0);

        transitions.schedule(ViewAction::ToggleNoise, &mut document, &mut store);
        transitions.orchestrator.advance(Duration::ZERO, &mut document, &mut store);
        // Turning off commits last
        assert!(store.toggles().noise_enabled);
        run_to_end(&mut transitions, &mut document, &mut store);
        assert!(!store.toggles().noise_enabled);
        assert_eq!(opacity(&document, NOISE), 0.0);
    }

    #[test]
    fn hidden_logo_swaps_colors_without_animating() {
        let (mut document, mut store) = home();
        let mut transitions = Transitions::default();
        transitions.schedule(ViewAction::ToggleAlternateLogo, &mut document, &mut store);
        run_to_end(&mut transitions, &mut document, &mut store);

        assert!(store.toggles().alternate_logo_enabled);
        assert_eq!(opacity(&document, LOGO), 0.0);
    }

    #[test]
    fn speed_and_exit_have_no_plan() {
        let toggles = ToggleState::default();
        assert!(plan_for(ViewAction::CycleSpeed, ThemeKey::Slime, &toggles).is_none());
        assert!(plan_for(ViewAction::Exit, ThemeKey::Slime, &toggles).is_none());
    }
}
