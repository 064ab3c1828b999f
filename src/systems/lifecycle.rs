//! View lifecycle
//!
//! The home view owns the bounce simulator and the orbital controller.
//! Exactly one of them is active at a time, chosen by the bounce-mode
//! flag. Store changes arrive through a subscription and are applied here:
//! entering bounce mode starts the simulator and tears the orbit down,
//! leaving it does the reverse.

use bevy::prelude::*;
use bevy::window::WindowResized;
use kurbo::Point;

use super::mailbox::Mailbox;
use super::sets::EngineSet;
use super::startup_layout::{orbit_item, Viewport, LOGO, LOGO_SIZE, ORBIT};
use super::transitions::{Transitions, HOME};
use crate::animation::bounce::BounceSimulator;
use crate::animation::orbital::OrbitalGestureController;
use crate::core::config::EngineSettings;
use crate::core::state::{Flag, StoreEvent, SubscriptionId, ThemeStateStore};
use crate::rendering::document::{Placement, PresentationSurface, SceneDocument, SurfaceError, TargetId};

/// Store events waiting to be applied
#[derive(Resource, Default)]
pub struct StoreEvents(pub Mailbox<StoreEvent>);

/// Logo positions reported by the simulator
#[derive(Resource, Default)]
pub struct BouncePlacements(pub Mailbox<Point>);

/// Rendered orbit rotations reported by the controller
#[derive(Resource, Default)]
pub struct OrbitRotations(pub Mailbox<f64>);

#[derive(Resource, Debug)]
pub struct StoreSubscription(pub SubscriptionId);

/// Lay the orbit out for the current viewport and listen for rotation
pub fn activate_orbit(
    orbital: &mut OrbitalGestureController,
    settings: &EngineSettings,
    viewport: &Viewport,
    rotations: &OrbitRotations,
    document: &mut SceneDocument,
) {
    orbital.initialize(
        settings.item_count,
        settings.radius_for(viewport.class),
        settings.starting_rotation_deg,
    );
    if !orbital.is_active() {
        return;
    }
    let sink = rotations.0.sender();
    orbital.on_rotation_change(move |rotation| {
        let _ = sink.send(rotation);
    });
    place_orbit_items(orbital, document);
}

/// Place `target`, skipping it silently if it is not mounted
fn place_or_warn(document: &mut SceneDocument, target: &TargetId, placement: Placement) {
    match document.place(target, placement) {
        Ok(()) | Err(SurfaceError::MissingTarget(_)) => {}
        Err(error) => warn!("Placement dropped: {}", error),
    }
}

/// Write every item's resting placement; missing items are skipped
pub fn place_orbit_items(orbital: &OrbitalGestureController, document: &mut SceneDocument) {
    let Some(layout) = orbital.layout() else {
        return;
    };
    for item in &layout.items {
        let local = item.local_position();
        let placement = Placement {
            translate: kurbo::Vec2::new(local.x, local.y),
            rotation_deg: item.rotation_deg(),
        };
        place_or_warn(document, &orbit_item(item.index), placement);
    }
}

fn start_bounce(
    simulator: &mut BounceSimulator,
    settings: &EngineSettings,
    store: &ThemeStateStore,
    viewport: &Viewport,
) {
    let speed = settings.bounce_speed_for(store.toggles().speed_variant);
    simulator.start(viewport.size, LOGO_SIZE, speed);
}

/// Startup: subscribe to the store and activate the initial mode
#[allow(clippy::too_many_arguments)]
pub fn start_views(
    mut commands: Commands,
    mut store: ResMut<ThemeStateStore>,
    mut simulator: ResMut<BounceSimulator>,
    mut orbital: ResMut<OrbitalGestureController>,
    mut document: ResMut<SceneDocument>,
    settings: Res<EngineSettings>,
    viewport: Res<Viewport>,
    events: Res<StoreEvents>,
    placements: Res<BouncePlacements>,
    rotations: Res<OrbitRotations>,
) {
    let sink = events.0.sender();
    let subscription = store.subscribe(move |event| {
        let _ = sink.send(*event);
    });
    commands.insert_resource(StoreSubscription(subscription));

    let sink = placements.0.sender();
    simulator.on_tick(move |position| {
        let _ = sink.send(position);
    });

    if store.toggles().bounce_mode_active {
        start_bounce(&mut simulator, &settings, &store, &viewport);
    } else {
        activate_orbit(&mut orbital, &settings, &viewport, &rotations, &mut document);
    }
    info!(
        "Ricochet ready: theme '{}', {} mode",
        store.active_theme(),
        if store.toggles().bounce_mode_active { "bounce" } else { "orbit" }
    );
}

/// Apply committed store changes to the simulators
#[allow(clippy::too_many_arguments)]
fn react_to_store(
    mut events: ResMut<StoreEvents>,
    store: Res<ThemeStateStore>,
    settings: Res<EngineSettings>,
    viewport: Res<Viewport>,
    rotations: Res<OrbitRotations>,
    mut simulator: ResMut<BounceSimulator>,
    mut orbital: ResMut<OrbitalGestureController>,
    mut document: ResMut<SceneDocument>,
) {
    for event in events.0.drain() {
        match event {
            StoreEvent::FlagChanged {
                flag: Flag::BounceMode,
                value: true,
            } => {
                orbital.teardown();
                start_bounce(&mut simulator, &settings, &store, &viewport);
            }
            StoreEvent::FlagChanged {
                flag: Flag::BounceMode,
                value: false,
            } => {
                simulator.stop();
                activate_orbit(&mut orbital, &settings, &viewport, &rotations, &mut document);
            }
            StoreEvent::SpeedChanged(variant) => {
                simulator.set_speed(settings.bounce_speed_for(variant));
                info!("Bounce speed: {:?}", variant);
            }
            StoreEvent::ThemeChanged { from, to } => {
                info!("Theme changed from '{}' to '{}'", from, to);
            }
            StoreEvent::FlagChanged { flag, value } => {
                debug!("Toggle '{}' is now {}", flag.label(), value);
            }
        }
    }
}

/// Fixed-interval clock for the bounce simulator
fn tick_bounce(real: Res<Time<Real>>, mut simulator: ResMut<BounceSimulator>) {
    simulator.tick_at(real.elapsed());
}

/// Display-synced clock: smooth the orbit and apply pending placements
fn animate_views(
    time: Res<Time>,
    mut orbital: ResMut<OrbitalGestureController>,
    mut document: ResMut<SceneDocument>,
    mut placements: ResMut<BouncePlacements>,
    mut rotations: ResMut<OrbitRotations>,
) {
    orbital.advance(time.delta());

    if let Some(rotation) = rotations.0.latest() {
        place_or_warn(&mut document, &ORBIT.into(), Placement::rotated(rotation));
    }
    if let Some(position) = placements.0.latest() {
        place_or_warn(&mut document, &LOGO.into(), Placement::at(position.x, position.y));
    }
}

fn handle_resize(
    mut resized: EventReader<WindowResized>,
    mut viewport: ResMut<Viewport>,
    mut simulator: ResMut<BounceSimulator>,
    mut orbital: ResMut<OrbitalGestureController>,
    mut document: ResMut<SceneDocument>,
    settings: Res<EngineSettings>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };
    let updated = Viewport::new(f64::from(event.width), f64::from(event.height));
    let class_changed = updated.class != viewport.class;
    *viewport = updated;

    // Both calls are no-ops for whichever view is inactive
    simulator.resize(updated.size);
    if class_changed {
        orbital.set_radius(settings.radius_for(updated.class));
        place_orbit_items(&orbital, &mut document);
        debug!("Viewport class is now {:?}", updated.class);
    }
}

/// Stop every clock and drop every listener when the app exits
fn teardown_on_exit(
    mut exit: EventReader<AppExit>,
    mut transitions: ResMut<Transitions>,
    mut simulator: ResMut<BounceSimulator>,
    mut orbital: ResMut<OrbitalGestureController>,
    mut store: ResMut<ThemeStateStore>,
    subscription: Option<Res<StoreSubscription>>,
) {
    if exit.read().next().is_none() {
        return;
    }
    let cancelled = transitions.orchestrator.cancel_owned_by(HOME);
    simulator.stop();
    orbital.teardown();
    if let Some(subscription) = subscription {
        store.unsubscribe(subscription.0);
    }
    debug!("Home view torn down, {} sequences cancelled", cancelled);
}

pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StoreEvents>()
            .init_resource::<BouncePlacements>()
            .init_resource::<OrbitRotations>()
            .add_systems(FixedUpdate, tick_bounce)
            .add_systems(Update, handle_resize.in_set(EngineSet::Input))
            .add_systems(Update, react_to_store.in_set(EngineSet::React))
            .add_systems(Update, animate_views.in_set(EngineSet::Animate))
            .add_systems(Last, teardown_on_exit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn orbital() -> OrbitalGestureController {
        let settings = EngineSettings::default();
        OrbitalGestureController::new(settings.gestures, Duration::from_millis(250))
    }

    #[test]
    fn orbit_activation_with_no_items_registers_nothing() {
        let settings = EngineSettings {
            item_count: 0,
            ..Default::default()
        };
        let mut orbital = orbital();
        let mut rotations = OrbitRotations::default();
        let mut document = SceneDocument::default();

        for _ in 0..3 {
            activate_orbit(&mut orbital, &settings, &Viewport::default(), &rotations, &mut document);
            orbital.teardown();
        }
        assert!(!orbital.is_active());
        assert_eq!(orbital.advance(Duration::from_millis(16)), None);
        assert!(rotations.0.drain().is_empty());
    }

    #[test]
    fn placements_skip_missing_targets_and_keep_valid_ones() {
        let mut document = SceneDocument::default();
        document.mount(LOGO, Default::default());

        place_or_warn(&mut document, &ORBIT.into(), Placement::rotated(30.0));
        place_or_warn(&mut document, &LOGO.into(), Placement::at(f64::INFINITY, 4.0));
        assert_eq!(document.style(&LOGO.into()).unwrap().placement, Placement::default());

        place_or_warn(&mut document, &LOGO.into(), Placement::at(3.0, 4.0));
        assert_eq!(document.style(&LOGO.into()).unwrap().placement, Placement::at(3.0, 4.0));
    }
}
