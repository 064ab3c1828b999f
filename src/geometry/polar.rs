//! Polar layout math

use kurbo::Point;

/// Wrap an unbounded angle into `[0, 360)`
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Point at `angle_deg` on a circle of `radius` around the origin.
/// Angles grow clockwise in document space (y points down).
pub fn polar_to_cartesian(angle_deg: f64, radius: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point::new(cos * radius, sin * radius)
}

/// Evenly spaced base angles for `count` items: `360 * i / count`
pub fn distribute_angles(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 360.0 * i as f64 / count as f64)
        .collect()
}
