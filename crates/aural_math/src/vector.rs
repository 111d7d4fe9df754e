//! Vector helpers for specular reflection.

use crate::Vec3;

/// Scale every component of `vector` by `scalar`.
#[inline]
pub fn scalar_multiply(scalar: f64, vector: Vec3) -> Vec3 {
    Vec3::new(scalar * vector.x, scalar * vector.y, scalar * vector.z)
}

/// Reflect `direction` about the unit surface normal `normal`.
///
/// d' = d - 2(d.n)n. The result keeps the magnitude of `direction`; it is
/// not renormalized. The sign of `normal` does not matter.
#[inline]
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - scalar_multiply(2.0 * direction.dot(normal), normal)
}
