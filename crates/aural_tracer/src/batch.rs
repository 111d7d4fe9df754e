//! Batched path sampling.
//!
//! A sampling round splits the outstanding hit target into batches that are
//! traced independently and in parallel. Each batch owns a deterministic
//! seed and a share of the remaining attempt budget.

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::{PathTracer, Raypath, SamplingStats};

/// Default number of paths per batch.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// One independently traced unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch within its round
    pub index: usize,
    /// Seed for this batch's random number generator
    pub seed: u64,
    /// Paths this batch tries to find
    pub target_hits: usize,
    /// Rays this batch may cast at most
    pub attempt_budget: u64,
}

/// Split a round of work into batches.
///
/// Hits and attempts are shared out evenly, with any remainder going to the
/// first batches. Every batch gets at least one attempt, so a round always
/// makes progress. Returns no batches when there is nothing left to do.
pub fn plan_round(
    remaining_hits: usize,
    remaining_attempts: u64,
    batch_size: usize,
    round: u64,
    base_seed: u64,
) -> Vec<Batch> {
    if remaining_hits == 0 || remaining_attempts == 0 {
        return Vec::new();
    }

    let batch_size = batch_size.max(1);
    let wanted = remaining_hits.div_ceil(batch_size) as u64;
    let count = wanted.min(remaining_attempts) as usize;

    let hits = share(remaining_hits as u64, count);
    let attempts = share(remaining_attempts, count);

    hits.into_iter()
        .zip(attempts)
        .enumerate()
        .map(|(index, (target_hits, attempt_budget))| Batch {
            index,
            seed: batch_seed(base_seed, round, index as u64),
            target_hits: target_hits as usize,
            attempt_budget,
        })
        .collect()
}

/// Split `total` into `parts` near-equal shares, larger shares first.
fn share(total: u64, parts: usize) -> Vec<u64> {
    let parts_u64 = parts as u64;
    let base = total / parts_u64;
    let extra = total % parts_u64;
    (0..parts_u64)
        .map(|i| base + u64::from(i < extra))
        .collect()
}

/// Derive a batch seed from the run seed (SplitMix64 finalizer).
fn batch_seed(base_seed: u64, round: u64, index: u64) -> u64 {
    let mut z = base_seed
        ^ round.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ index.wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Trace a single batch.
///
/// Rays are emitted until the batch reaches its hit target or spends its
/// attempt budget, whichever comes first. Failed traces are only counted.
pub fn run_batch(tracer: &PathTracer<'_>, batch: &Batch) -> BatchResult {
    let mut rng = StdRng::seed_from_u64(batch.seed);
    let sampling = tracer.config().sampling;
    let source = tracer.source();

    let mut paths = Vec::with_capacity(batch.target_hits.min(1024));
    let mut stats = SamplingStats::default();

    while paths.len() < batch.target_hits && stats.attempts < batch.attempt_budget {
        let (ray, _strength) = source.emit(&mut rng, sampling);
        let outcome = tracer.trace_ray(ray);
        stats.record(&outcome);
        if let Ok(path) = outcome {
            paths.push(path);
        }
    }

    debug!(
        "Batch {}: {} / {} paths in {} attempts",
        batch.index,
        paths.len(),
        batch.target_hits,
        stats.attempts
    );

    BatchResult::new(*batch, paths, stats)
}

/// Result of tracing a batch.
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// The batch that was traced
    pub batch: Batch,
    /// Successful paths, in the order they were found
    pub paths: Vec<Raypath>,
    pub stats: SamplingStats,
}

impl BatchResult {
    pub fn new(batch: Batch, paths: Vec<Raypath>, stats: SamplingStats) -> Self {
        Self { batch, paths, stats }
    }
}
