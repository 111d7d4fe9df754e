//! End-to-end simulation: sample paths, then assemble the impulse response.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{ImpulseConfig, ImpulseResponse, PathTracer, Raypath, SamplingStats, TraceResult};

/// Output of a simulation run.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub paths: Vec<Raypath>,
    pub stats: SamplingStats,
    /// Normalized impulse response
    pub impulse: ImpulseResponse,
}

impl Simulation {
    /// Number of paths per reflection order, indexed by order.
    pub fn order_histogram(&self) -> Vec<usize> {
        let max_order = self.paths.iter().map(Raypath::order).max().unwrap_or(0);
        let mut histogram = vec![0; max_order + 1];
        for path in &self.paths {
            histogram[path.order()] += 1;
        }
        histogram
    }
}

/// Sample `tracer.config().ray_count` paths and bin them into a normalized
/// impulse response.
pub fn simulate(tracer: &PathTracer<'_>, config: &ImpulseConfig) -> TraceResult<Simulation> {
    config.validate()?;

    let sampling = tracer.find_paths_with_stats(tracer.config().ray_count)?;

    // Polarity draws get their own stream so they never disturb sampling
    let mut rng = match tracer.config().seed {
        Some(seed) => StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x5EED),
        None => StdRng::from_entropy(),
    };
    let mut impulse = ImpulseResponse::assemble(&sampling.paths, config, &mut rng)?;
    impulse.normalize();

    info!(
        "Impulse response: {} samples ({:.3} s at {} Hz) from {} arrivals",
        impulse.len(),
        impulse.duration(),
        impulse.sample_rate(),
        sampling.paths.len()
    );

    Ok(Simulation {
        paths: sampling.paths,
        stats: sampling.stats,
        impulse,
    })
}
