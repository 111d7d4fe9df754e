use crate::Vec3;

/// A ray in model space: a line starting at `origin` heading along `direction`.
///
/// `direction` is deliberately not normalized. Sources emit per-axis uniform
/// directions and the tracer keeps whatever magnitude the reflection law
/// produces, so `t` is a ray parameter rather than a distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Euclidean distance travelled when moving `t` along this ray.
    #[inline]
    pub fn distance_at(&self, t: f64) -> f64 {
        t * self.direction.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_not_normalized() {
        let direction = Vec3::new(0.5, -1.0, 0.25);
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), direction);

        assert_eq!(ray.direction(), direction);
        assert_eq!(ray.origin(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_distance_at_scales_with_direction_length() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert_eq!(ray.distance_at(2.0), 10.0);
    }
}
