//! Coordinate conversion between document space and world space
//!
//! Document space has its origin at the top-left corner of the viewport
//! with y pointing down, in pixels. World space is Bevy's 2D space with the
//! origin at the center of the viewport and y pointing up.

use bevy::prelude::*;
use kurbo::{Point, Size};

/// Convert a document-space point to a world-space translation
pub fn document_to_world(point: Point, viewport: Size) -> Vec2 {
    Vec2::new(
        (point.x - viewport.width / 2.0) as f32,
        (viewport.height / 2.0 - point.y) as f32,
    )
}

/// Convert an offset relative to a document-space center (y down) to world space
pub fn offset_to_world(offset: Point) -> Vec2 {
    Vec2::new(offset.x as f32, -offset.y as f32)
}

/// Convert a clockwise document rotation in degrees to a world-space rotation
pub fn rotation_to_world(degrees: f64) -> Quat {
    Quat::from_rotation_z(-(degrees.to_radians() as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_center_is_world_origin() {
        let viewport = Size::new(800.0, 600.0);
        assert_eq!(document_to_world(Point::new(400.0, 300.0), viewport), Vec2::ZERO);
        assert_eq!(
            document_to_world(Point::new(0.0, 0.0), viewport),
            Vec2::new(-400.0, 300.0)
        );
    }

    #[test]
    fn offsets_flip_vertically() {
        assert_eq!(offset_to_world(Point::new(3.0, 4.0)), Vec2::new(3.0, -4.0));
    }
}
