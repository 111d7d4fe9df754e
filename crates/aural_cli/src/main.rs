use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use aural_core::{load_room_json, SamplingStrategy};
use aural_tracer::{simulate, BinningMode, PathTracer, SimulationConfig, WavSink};
use clap::Parser;

/// Simulate a room impulse response by specular ray tracing.
#[derive(Parser, Debug)]
#[command(name = "aural", version, about)]
struct Args {
    /// Room description (JSON)
    room: PathBuf,

    /// Simulation settings (JSON); missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of paths to find
    #[arg(short, long)]
    rays: Option<usize>,

    /// Maximum reflection order
    #[arg(long)]
    max_order: Option<u32>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the impulse response
    #[arg(short, long, default_value = "impulse.wav")]
    output: PathBuf,

    /// Sum arrivals that land on the same sample instead of overwriting
    #[arg(long)]
    accumulate: bool,

    /// Sample directions uniformly on the unit sphere
    #[arg(long)]
    unit_sphere: bool,
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(rays) = args.rays {
        config.trace.ray_count = rays;
    }
    if let Some(max_order) = args.max_order {
        config.trace.max_order = max_order;
    }
    if args.seed.is_some() {
        config.trace.seed = args.seed;
    }
    if args.accumulate {
        config.impulse.binning = BinningMode::Accumulate;
    }
    if args.unit_sphere {
        config.trace.sampling = SamplingStrategy::UnitSphere;
    }

    let model = load_room_json(&args.room)
        .with_context(|| format!("loading room {}", args.room.display()))?;
    // Geometry units come from the room file
    config.impulse.length_unit = model.length_unit;

    let extent = model.scene.bounds().size();
    log::info!(
        "Room '{}': {:.1} x {:.1} x {:.1} {:?}, receiver r={} at {}",
        model.name,
        extent.x,
        extent.y,
        extent.z,
        model.length_unit,
        model.receiver.radius(),
        model.receiver.center()
    );

    let tracer = PathTracer::new(
        &model.scene,
        &model.room,
        &model.source,
        &model.receiver,
        config.trace.clone(),
    );
    let simulation = simulate(&tracer, &config.impulse).context("simulation failed")?;

    for (order, count) in simulation.order_histogram().iter().enumerate() {
        if *count > 0 {
            log::info!("  order {:>3}: {} paths", order, count);
        }
    }
    let last_arrival = simulation
        .paths
        .iter()
        .map(|p| p.arrival_time(config.impulse.speed_of_sound, config.impulse.length_unit))
        .fold(0.0, f64::max);
    log::info!(
        "{} attempts, last arrival at {:.3} s",
        simulation.stats.attempts,
        last_arrival
    );
    if let Some(first) = simulation.paths.first() {
        log::debug!("First path found: {}", first);
    }

    let mut sink = WavSink::new(&args.output);
    simulation
        .impulse
        .write_to(&mut sink, config.impulse.bits_per_sample)
        .with_context(|| format!("writing {}", args.output.display()))?;

    Ok(())
}
