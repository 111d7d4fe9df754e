//! Raypaths: ordered chains of intersections from source to receiver.

use std::fmt;
use std::sync::Arc;

use aural_core::{AcousticResult, Layer, LengthUnit, OctaveBand};
use aural_math::Vec3;

/// One point on a raypath.
///
/// Surface hits carry the layer they struck. The source emission point and
/// the receiver capture point carry none and absorb nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Intersection {
    point: Vec3,
    layer: Option<Arc<Layer>>,
}

impl Intersection {
    /// The source emission point or the receiver capture point.
    pub fn endpoint(point: Vec3) -> Self {
        Self { point, layer: None }
    }

    /// A reflection off a surface of `layer`.
    pub fn surface(point: Vec3, layer: Arc<Layer>) -> Self {
        Self {
            point,
            layer: Some(layer),
        }
    }

    pub fn point(&self) -> Vec3 {
        self.point
    }

    pub fn layer(&self) -> Option<&Arc<Layer>> {
        self.layer.as_ref()
    }

    pub fn is_endpoint(&self) -> bool {
        self.layer.is_none()
    }
}

/// An ordered chain of intersections.
///
/// A completed path starts at the source, lists every reflection in order,
/// and ends at the receiver capture point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Raypath {
    chain: Vec<Intersection>,
}

impl Raypath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self { chain: Vec::new() }
    }

    /// Append the next intersection.
    pub fn push(&mut self, intersection: Intersection) {
        self.chain.push(intersection);
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Untagged source and receiver endpoints around tagged reflections.
    pub fn is_complete(&self) -> bool {
        match self.chain.as_slice() {
            [first, middle @ .., last] => {
                first.is_endpoint()
                    && last.is_endpoint()
                    && middle.iter().all(|i| !i.is_endpoint())
            }
            _ => false,
        }
    }

    /// Reflection order: number of surface bounces.
    pub fn order(&self) -> usize {
        self.chain.len().saturating_sub(2)
    }

    /// Sum of segment lengths in model units.
    pub fn total_length(&self) -> f64 {
        self.chain
            .windows(2)
            .map(|pair| pair[0].point.distance(pair[1].point))
            .sum()
    }

    /// Travel time in seconds at `speed_of_sound` m/s, with the geometry
    /// measured in `unit`.
    pub fn arrival_time(&self, speed_of_sound: f64, unit: LengthUnit) -> f64 {
        unit.to_meters(self.total_length()) / speed_of_sound
    }

    /// Energy left after every reflection, at an exact octave-band frequency.
    pub fn arrival_energy(&self, initial_energy: f64, hz: u32) -> AcousticResult<f64> {
        OctaveBand::from_hz(hz).map(|band| self.arrival_energy_in(initial_energy, band))
    }

    pub fn arrival_energy_in(&self, initial_energy: f64, band: OctaveBand) -> f64 {
        self.chain
            .iter()
            .filter_map(Intersection::layer)
            .fold(initial_energy, |energy, layer| {
                energy * (1.0 - layer.material.absorption_in(band))
            })
    }

    /// Arrival energy in dB relative to `initial_energy`.
    pub fn arrival_level_db(&self, initial_energy: f64, hz: u32) -> AcousticResult<f64> {
        let energy = self.arrival_energy(initial_energy, hz)?;
        Ok(10.0 * (energy / initial_energy).log10())
    }
}

impl fmt::Display for Raypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let energy = self.arrival_energy_in(1.0, OctaveBand::Hz1000);
        write!(
            f,
            "order {}, length {:.2}, energy at 1000 Hz {:.4} ({:.1} dB)",
            self.order(),
            self.total_length(),
            energy,
            10.0 * energy.log10()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aural_core::{AcousticError, Material};

    fn layer(alpha: f64) -> Arc<Layer> {
        Arc::new(Layer::new(
            "walls",
            Arc::new(Material::new("test", 0, [alpha; 7], "")),
        ))
    }

    fn path_with_bounces(alphas: &[f64]) -> Raypath {
        let mut path = Raypath::new();
        path.push(Intersection::endpoint(Vec3::ZERO));
        for (i, alpha) in alphas.iter().enumerate() {
            path.push(Intersection::surface(Vec3::new(i as f64 + 1.0, 0.0, 0.0), layer(*alpha)));
        }
        path.push(Intersection::endpoint(Vec3::new(alphas.len() as f64 + 1.0, 0.0, 0.0)));
        path
    }

    #[test]
    fn test_order_counts_bounces_only() {
        assert_eq!(path_with_bounces(&[]).order(), 0);
        assert_eq!(path_with_bounces(&[0.1]).order(), 1);
        assert_eq!(path_with_bounces(&[0.1, 0.2, 0.3]).order(), 3);

        for path in [path_with_bounces(&[]), path_with_bounces(&[0.5, 0.5])] {
            assert_eq!(path.order(), path.len() - 2);
        }
        assert_eq!(Raypath::new().order(), 0);
    }

    #[test]
    fn test_total_length() {
        let mut path = Raypath::new();
        path.push(Intersection::endpoint(Vec3::ZERO));
        path.push(Intersection::surface(Vec3::new(3.0, 4.0, 0.0), layer(0.1)));
        path.push(Intersection::endpoint(Vec3::new(3.0, 4.0, 12.0)));
        assert_eq!(path.total_length(), 17.0);
    }

    #[test]
    fn test_arrival_time_converts_units() {
        let mut path = Raypath::new();
        path.push(Intersection::endpoint(Vec3::ZERO));
        path.push(Intersection::endpoint(Vec3::new(343.0, 0.0, 0.0)));

        assert!((path.arrival_time(343.0, LengthUnit::Meters) - 1.0).abs() < 1e-12);
        assert!((path.arrival_time(343.0, LengthUnit::Inches) - 0.0254).abs() < 1e-12);
    }

    #[test]
    fn test_arrival_energy_multiplies_reflections() {
        let path = path_with_bounces(&[0.5, 0.2]);
        let energy = path.arrival_energy(1.0, 1000).unwrap();
        assert!((energy - 0.4).abs() < 1e-12);

        let direct = path_with_bounces(&[]);
        assert_eq!(direct.arrival_energy(2.0, 125).unwrap(), 2.0);
    }

    #[test]
    fn test_arrival_energy_non_increasing() {
        let alphas = [0.0, 0.3, 1.0, 0.05, 0.7];
        let mut previous = f64::INFINITY;
        for n in 0..=alphas.len() {
            let energy = path_with_bounces(&alphas[..n]).arrival_energy(1.0, 500).unwrap();
            assert!(energy <= previous);
            previous = energy;
        }
    }

    #[test]
    fn test_fully_absorptive_surface_kills_energy() {
        let path = path_with_bounces(&[0.1, 1.0, 0.1]);
        for band in OctaveBand::ALL {
            assert_eq!(path.arrival_energy(1.0, band.hz()).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_arrival_energy_rejects_unknown_band() {
        let path = path_with_bounces(&[0.5]);
        assert!(matches!(
            path.arrival_energy(1.0, 440),
            Err(AcousticError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_arrival_level_db() {
        let path = path_with_bounces(&[0.9]);
        let db = path.arrival_level_db(1.0, 1000).unwrap();
        assert!((db + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_complete() {
        assert!(path_with_bounces(&[]).is_complete());
        assert!(path_with_bounces(&[0.1, 0.1]).is_complete());

        let mut open = Raypath::new();
        open.push(Intersection::endpoint(Vec3::ZERO));
        assert!(!open.is_complete());

        let mut tagged_end = path_with_bounces(&[0.1]);
        tagged_end.push(Intersection::surface(Vec3::ONE, layer(0.1)));
        assert!(!tagged_end.is_complete());
    }

    #[test]
    fn test_display() {
        let text = path_with_bounces(&[0.5]).to_string();
        assert!(text.starts_with("order 1"));
        assert!(text.contains("dB"));
    }
}
