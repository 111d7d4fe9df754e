//! Omnidirectional sound source.

use aural_math::{Ray, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How emission directions are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Each axis drawn independently from [-1, 1] and left unnormalized.
    ///
    /// Directions cluster toward the corners and edges of the cube, and the
    /// direction magnitude varies from ray to ray.
    #[default]
    Cube,

    /// Uniform on the unit sphere (rejection sampled).
    UnitSphere,
}

impl SamplingStrategy {
    /// Draw one emission direction. Never returns the zero vector.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Vec3 {
        loop {
            let v = Vec3::new(
                rng.gen::<f64>() * 2.0 - 1.0,
                rng.gen::<f64>() * 2.0 - 1.0,
                rng.gen::<f64>() * 2.0 - 1.0,
            );
            let len_sq = v.length_squared();
            match self {
                SamplingStrategy::Cube if len_sq > 0.0 => return v,
                SamplingStrategy::UnitSphere if len_sq > 1e-6 && len_sq <= 1.0 => {
                    return v / len_sq.sqrt()
                }
                _ => continue,
            }
        }
    }
}

/// A point source radiating uniformly in every direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Source {
    name: String,
    position: Vec3,
    strength: f64,
}

impl Source {
    pub fn new(name: impl Into<String>, position: Vec3, strength: f64) -> Self {
        Self {
            name: name.into(),
            position,
            strength,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Strength radiated along `direction`. Uniform until directivity lands.
    pub fn strength_towards(&self, _direction: Vec3) -> f64 {
        self.strength
    }

    /// Draw a random emission direction.
    pub fn random_direction<R: Rng + ?Sized>(&self, rng: &mut R, strategy: SamplingStrategy) -> Vec3 {
        strategy.sample(rng)
    }

    /// Emit one ray from the source along with the strength it carries.
    pub fn emit<R: Rng + ?Sized>(&self, rng: &mut R, strategy: SamplingStrategy) -> (Ray, f64) {
        let direction = self.random_direction(rng, strategy);
        (
            Ray::new(self.position, direction),
            self.strength_towards(direction),
        )
    }
}
