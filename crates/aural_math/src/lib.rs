// Re-export glam's double precision types. Path lengths are summed over many
// bounces in model units (inches by default), so f32 drifts too far.
pub use glam::{dvec3, DVec3};

/// Point / direction type used across aural.
pub type Vec3 = DVec3;

// aural math types
mod aabb;
mod interval;
mod ray;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vector::{reflect, scalar_multiply};
