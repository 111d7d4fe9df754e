//! Spherical receiver used as a geometric detector.
//!
//! The sphere does not absorb anything; it only decides where a ray counts
//! as captured. Ray/sphere math follows Long, *Architectural Acoustics*
//! (2nd ed.), p. 885.

use std::f64::consts::PI;

use aural_math::{Ray, Vec3};

use crate::{AcousticError, AcousticResult};

/// Both roots of the ray/sphere quadratic, as absolute ray parameters.
///
/// The roots are unsigned, so neither is reliably the entry or the exit
/// point. Use `nearest` for the capture parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiverRoots {
    pub t_plus: f64,
    pub t_minus: f64,
}

impl ReceiverRoots {
    /// The smaller of the two roots.
    pub fn nearest(&self) -> f64 {
        self.t_plus.min(self.t_minus)
    }
}

/// A spherical receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct Receiver {
    name: String,
    center: Vec3,
    radius: f64,
}

impl Receiver {
    /// Create a receiver. The radius must be finite and strictly positive.
    pub fn new(name: impl Into<String>, center: Vec3, radius: f64) -> AcousticResult<Self> {
        let name = name.into();
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AcousticError::InvalidConfiguration(format!(
                "receiver '{name}' has radius {radius}; radius must be positive"
            )));
        }
        Ok(Self {
            name,
            center,
            radius,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3)
    }

    /// Discriminant of the line/sphere quadratic:
    /// (d.(o-c))^2 - |d|^2 (|o-c|^2 - r^2)
    fn discriminant(&self, ray: &Ray) -> f64 {
        let oc = ray.origin() - self.center;
        let b = ray.direction().dot(oc);
        let a = ray.direction().length_squared();
        let c = oc.length_squared() - self.radius * self.radius;
        b * b - a * c
    }

    /// Whether the infinite line through `ray` crosses the sphere.
    ///
    /// This is a line test: it does not care which way the ray points. A
    /// tangent line (discriminant exactly zero) is a miss.
    pub fn intersects(&self, ray: &Ray) -> bool {
        self.discriminant(ray) > 0.0
    }

    /// Absolute values of both quadratic roots, or `None` when the line
    /// misses the sphere.
    pub fn distance_to_intersection(&self, ray: &Ray) -> Option<ReceiverRoots> {
        let discriminant = self.discriminant(ray);
        if discriminant <= 0.0 {
            return None;
        }

        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = ray.direction().dot(oc);
        let sqrtd = discriminant.sqrt();

        Some(ReceiverRoots {
            t_plus: ((-b + sqrtd) / a).abs(),
            t_minus: ((-b - sqrtd) / a).abs(),
        })
    }

    /// Smallest strictly positive root, i.e. where the ray itself (not the
    /// line) first touches the sphere going forward.
    pub fn forward_intersection(&self, ray: &Ray) -> Option<f64> {
        let discriminant = self.discriminant(ray);
        if discriminant <= 0.0 {
            return None;
        }

        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let h = -ray.direction().dot(oc);
        let sqrtd = discriminant.sqrt();

        // Find the nearest root ahead of the origin
        let mut root = (h - sqrtd) / a;
        if root <= 0.0 {
            root = (h + sqrtd) / a;
            if root <= 0.0 {
                return None;
            }
        }
        Some(root)
    }
}
