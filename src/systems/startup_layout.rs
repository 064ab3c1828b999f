//! Startup scene layout
//!
//! Spawns the camera and every element the engine animates, and mounts
//! each one in the [`SceneDocument`] under its target id. Entities carry a
//! [`Target`] so the sync systems can find the document entry they mirror.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use kurbo::Size;

use crate::animation::orbital::ViewportClass;
use crate::core::config::{EngineSettings, DEFAULT_WINDOW_SIZE};
use crate::core::state::ThemeStateStore;
use crate::rendering::document::{ElementStyle, SceneDocument, TargetId};
use crate::ui::theme::ColorRole;

pub const LOGO: &str = "logo";
pub const ORBIT: &str = "orbit";
pub const GRID: &str = "grid";
pub const NOISE: &str = "noise";
/// Full-screen layer in the background color, used to crossfade themes
pub const VEIL: &str = "veil";

pub const LOGO_SIZE: Size = Size::new(160.0, 80.0);
pub const ITEM_SIZE: f32 = 44.0;

const GRID_SPACING: f32 = 64.0;
const GRID_EXTENT: f32 = 4096.0;
const GRID_LINE_WIDTH: f32 = 1.0;

const NOISE_Z: f32 = 1.0;
const GRID_Z: f32 = 2.0;
const ORBIT_Z: f32 = 5.0;
const LOGO_Z: f32 = 10.0;
const VEIL_Z: f32 = 50.0;

pub fn orbit_item(index: usize) -> TargetId {
    TargetId::new(format!("orbit-item-{index}"))
}

/// The document entry an entity mirrors
#[derive(Component, Debug, Clone)]
pub struct Target(pub TargetId);

/// A target whose opacity and blur also apply to this entity
#[derive(Component, Debug, Clone)]
pub struct Group(pub TargetId);

/// How an entity's placement maps to world space
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Placement is the top-left corner in document space
    Document { size: Vec2 },
    /// Placement is an offset from the parent, y down
    Relative,
    /// Fixed world position; placement is ignored
    Fixed(Vec2),
}

/// Base color of a sprite
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub role: ColorRole,
    pub alpha: f32,
    /// Role used while the alternate logo is enabled
    pub alternate: Option<ColorRole>,
}

impl Tint {
    pub fn new(role: ColorRole, alpha: f32) -> Self {
        Self {
            role,
            alpha,
            alternate: None,
        }
    }
}

/// Current viewport in document pixels
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub class: ViewportClass,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            class: ViewportClass::from_width(width),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(f64::from(DEFAULT_WINDOW_SIZE.x), f64::from(DEFAULT_WINDOW_SIZE.y))
    }
}

fn visible(on: bool) -> ElementStyle {
    if on {
        ElementStyle::default()
    } else {
        ElementStyle::hidden()
    }
}

/// System to create the scene and mount every target
pub fn create_startup_layout(
    mut commands: Commands,
    mut document: ResMut<SceneDocument>,
    settings: Res<EngineSettings>,
    store: Res<ThemeStateStore>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let viewport = windows
        .single()
        .map(|window| Viewport::new(f64::from(window.width()), f64::from(window.height())))
        .unwrap_or_default();
    commands.insert_resource(viewport);

    let toggles = *store.toggles();
    commands.spawn(Camera2d);

    // Noise overlay
    commands.spawn((
        Sprite {
            custom_size: Some(Vec2::splat(GRID_EXTENT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, NOISE_Z),
        Target(NOISE.into()),
        Anchor::Fixed(Vec2::ZERO),
        Tint::new(ColorRole::Muted, 0.18),
    ));
    document.mount(NOISE, visible(toggles.noise_enabled));

    // Grid lines, all sharing one target
    let lines = (GRID_EXTENT / GRID_SPACING) as i32;
    for i in -lines / 2..=lines / 2 {
        let offset = i as f32 * GRID_SPACING;
        for (size, position) in [
            (Vec2::new(GRID_LINE_WIDTH, GRID_EXTENT), Vec2::new(offset, 0.0)),
            (Vec2::new(GRID_EXTENT, GRID_LINE_WIDTH), Vec2::new(0.0, offset)),
        ] {
            commands.spawn((
                Sprite {
                    custom_size: Some(size),
                    ..default()
                },
                Transform::from_xyz(position.x, position.y, GRID_Z),
                Target(GRID.into()),
                Anchor::Fixed(position),
                Tint::new(ColorRole::Muted, 0.6),
            ));
        }
    }
    document.mount(GRID, visible(toggles.grid_enabled));

    // Orbit root and its items
    commands
        .spawn((
            Transform::from_xyz(0.0, 0.0, ORBIT_Z),
            Visibility::default(),
            Target(ORBIT.into()),
            Anchor::Fixed(Vec2::ZERO),
        ))
        .with_children(|orbit| {
            for index in 0..settings.item_count {
                orbit.spawn((
                    Sprite {
                        custom_size: Some(Vec2::splat(ITEM_SIZE)),
                        ..default()
                    },
                    Transform::default(),
                    Target(orbit_item(index)),
                    Group(ORBIT.into()),
                    Anchor::Relative,
                    Tint::new(
                        if index == 0 { ColorRole::Accent } else { ColorRole::Foreground },
                        1.0,
                    ),
                ));
            }
        });
    document.mount(ORBIT, visible(!toggles.bounce_mode_active));
    for index in 0..settings.item_count {
        document.mount(orbit_item(index), ElementStyle::default());
    }

    // Logo
    commands.spawn((
        Sprite {
            custom_size: Some(Vec2::new(LOGO_SIZE.width as f32, LOGO_SIZE.height as f32)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, LOGO_Z),
        Target(LOGO.into()),
        Anchor::Document {
            size: Vec2::new(LOGO_SIZE.width as f32, LOGO_SIZE.height as f32),
        },
        Tint {
            role: ColorRole::Foreground,
            alpha: 1.0,
            alternate: Some(ColorRole::Accent),
        },
    ));
    document.mount(LOGO, visible(toggles.bounce_mode_active));

    // Veil over everything, transparent until a theme change
    commands.spawn((
        Sprite {
            custom_size: Some(Vec2::splat(GRID_EXTENT)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, VEIL_Z),
        Target(VEIL.into()),
        Anchor::Fixed(Vec2::ZERO),
        Tint::new(ColorRole::Background, 1.0),
    ));
    document.mount(VEIL, ElementStyle::hidden());

    debug!(
        "Startup layout created: {} orbit items, viewport {}x{} ({:?})",
        settings.item_count, viewport.size.width, viewport.size.height, viewport.class
    );
}
