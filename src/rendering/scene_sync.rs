//! Document-to-scene mirroring
//!
//! The [`SceneDocument`] is the source of truth for every animated element.
//! These systems copy it onto sprite colors and transforms once per frame,
//! and only when the document, the theme or the viewport changed.
//!
//! Document space has its origin at the viewport's top-left corner with y
//! pointing down and clockwise rotations. Bevy's world space is centered
//! with y up, so both y and rotation are flipped here.

use bevy::prelude::*;
use kurbo::Point;

use crate::core::state::ThemeStateStore;
use crate::geometry::{document_to_world, offset_to_world, rotation_to_world};
use crate::rendering::document::{ElementStyle, SceneDocument};
use crate::systems::sets::EngineSet;
use crate::systems::startup_layout::{Anchor, Group, Target, Tint, Viewport};
use crate::ui::theme::ThemePalette;

/// Sprites have no blur filter; blur fades them out instead
const BLUR_FADE_PER_PX: f32 = 0.1;

/// Palette resolved from the store's current root style
#[derive(Resource, Debug, Default)]
pub struct ScenePalette {
    pub palette: ThemePalette,
    root_revision: Option<u64>,
}

/// Revisions last mirrored onto the scene
#[derive(Resource, Debug, Default)]
struct SyncedRevisions {
    document: Option<u64>,
    palette: Option<u64>,
}

/// World-space translation for a placement under `anchor`
pub fn world_translation(anchor: &Anchor, style: &ElementStyle, viewport: &Viewport) -> Vec2 {
    let offset = offset_to_world(Point::new(style.translate_x, style.translate_y));
    let placed = style.placement.translate;
    match anchor {
        Anchor::Document { size } => {
            let center = Point::new(
                placed.x + f64::from(size.x) / 2.0,
                placed.y + f64::from(size.y) / 2.0,
            );
            document_to_world(center, viewport.size) + offset
        }
        Anchor::Relative => offset_to_world(placed.to_point()) + offset,
        Anchor::Fixed(position) => *position + offset,
    }
}

/// Clockwise document rotation as a world rotation
pub fn world_rotation(style: &ElementStyle) -> Quat {
    rotation_to_world(style.placement.rotation_deg)
}

/// Final sprite alpha from the tint, the element and its group
pub fn sprite_alpha(tint_alpha: f32, style: &ElementStyle, group: Option<&ElementStyle>) -> f32 {
    let (group_opacity, group_blur) = group.map_or((1.0, 0.0), |g| (g.opacity, g.blur));
    let opacity = (style.opacity * group_opacity) as f32;
    let blur = (style.blur + group_blur).max(0.0) as f32;
    (tint_alpha * opacity / (1.0 + blur * BLUR_FADE_PER_PX)).clamp(0.0, 1.0)
}

fn refresh_palette(
    store: Res<ThemeStateStore>,
    mut scene: ResMut<ScenePalette>,
    mut clear_color: ResMut<ClearColor>,
) {
    let revision = store.root().revision();
    if scene.root_revision == Some(revision) {
        return;
    }
    scene.palette = ThemePalette::from_root(store.root());
    scene.root_revision = Some(revision);
    clear_color.0 = scene.palette.background;
    debug!("Scene palette updated for theme '{}'", store.active_theme());
}

#[allow(clippy::type_complexity)]
fn sync_scene(
    document: Res<SceneDocument>,
    scene: Res<ScenePalette>,
    store: Res<ThemeStateStore>,
    viewport: Res<Viewport>,
    mut synced: ResMut<SyncedRevisions>,
    mut sprites: Query<(&Target, Option<&Group>, &Anchor, &Tint, &mut Sprite, &mut Transform)>,
    mut groups: Query<(&Target, &Anchor, &mut Transform, &mut Visibility), Without<Sprite>>,
) {
    let palette_revision = scene.root_revision;
    let up_to_date = synced.document == Some(document.revision())
        && synced.palette == palette_revision
        && !viewport.is_changed()
        && !store.is_changed();
    if up_to_date {
        return;
    }

    for (target, anchor, mut transform, mut visibility) in groups.iter_mut() {
        let Some(style) = document.style(&target.0) else {
            continue;
        };
        let translation = world_translation(anchor, style, &viewport);
        transform.translation = translation.extend(transform.translation.z);
        transform.rotation = world_rotation(style);
        transform.scale = Vec3::splat(style.scale as f32);
        *visibility = if style.opacity > 0.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    let alternate = store.toggles().alternate_logo_enabled;
    for (target, group, anchor, tint, mut sprite, mut transform) in sprites.iter_mut() {
        let Some(style) = document.style(&target.0) else {
            continue;
        };
        let group_style = group.and_then(|g| document.style(&g.0));

        let role = match tint.alternate {
            Some(role) if alternate => role,
            _ => tint.role,
        };
        let alpha = sprite_alpha(tint.alpha, style, group_style);
        sprite.color = scene.palette.role(role).with_alpha(alpha);

        let translation = world_translation(anchor, style, &viewport);
        transform.translation = translation.extend(transform.translation.z);
        transform.rotation = world_rotation(style);
        transform.scale = Vec3::splat(style.scale as f32);
    }

    synced.document = Some(document.revision());
    synced.palette = palette_revision;
}

pub struct SceneSyncPlugin;

impl Plugin for SceneSyncPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScenePalette>()
            .init_resource::<SyncedRevisions>()
            .add_systems(
                Update,
                (refresh_palette, sync_scene).chain().in_set(EngineSet::Sync),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::document::Placement;

    fn placed(x: f64, y: f64) -> ElementStyle {
        ElementStyle {
            placement: Placement::at(x, y),
            ..default()
        }
    }

    #[test]
    fn document_origin_is_the_top_left_corner() {
        let viewport = Viewport::new(400.0, 200.0);
        let anchor = Anchor::Document {
            size: Vec2::new(100.0, 50.0),
        };
        assert_eq!(
            world_translation(&anchor, &placed(0.0, 0.0), &viewport),
            Vec2::new(-150.0, 75.0)
        );
        // Centered placement lands on the world origin
        assert_eq!(
            world_translation(&anchor, &placed(150.0, 75.0), &viewport),
            Vec2::ZERO
        );
    }

    #[test]
    fn relative_placements_flip_y() {
        let style = ElementStyle {
            translate_y: 10.0,
            ..placed(20.0, 30.0)
        };
        assert_eq!(
            world_translation(&Anchor::Relative, &style, &Viewport::default()),
            Vec2::new(20.0, -40.0)
        );
        assert_eq!(
            world_translation(&Anchor::Fixed(Vec2::new(5.0, 5.0)), &style, &Viewport::default()),
            Vec2::new(5.0, -5.0)
        );
    }

    #[test]
    fn clockwise_rotation_turns_negative_in_world_space() {
        let style = ElementStyle {
            placement: Placement::rotated(90.0),
            ..default()
        };
        let turned = world_rotation(&style) * Vec3::X;
        assert!((turned - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn alpha_combines_tint_opacity_group_and_blur() {
        let style = ElementStyle {
            opacity: 0.5,
            ..default()
        };
        assert_eq!(sprite_alpha(0.8, &style, None), 0.4);

        let hidden_group = ElementStyle::hidden();
        assert_eq!(sprite_alpha(1.0, &ElementStyle::default(), Some(&hidden_group)), 0.0);

        let blurred = ElementStyle {
            blur: 10.0,
            ..default()
        };
        assert_eq!(sprite_alpha(1.0, &blurred, None), 0.5);
    }
}
