//! Geometric Primitives and Operations

pub mod polar;
pub mod utilities;

// Re-export commonly used items
pub use polar::{distribute_angles, normalize_degrees, polar_to_cartesian};
pub use utilities::{document_to_world, offset_to_world, rotation_to_world};
