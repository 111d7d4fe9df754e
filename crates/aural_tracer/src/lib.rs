//! aural tracer - specular reflection paths and impulse responses.
//!
//! Rays leave the source in random directions, bounce specularly off the
//! room's opaque surfaces, and count once they can reach the spherical
//! receiver unobstructed. Each successful chain of intersections is a
//! `Raypath`; sorted by arrival time and binned into a sample buffer they
//! form the room impulse response.
//!
//! - [`PathTracer`] traces single rays and samples paths in parallel
//! - [`Raypath`] carries the derived quantities (order, length, time, energy)
//! - [`ImpulseResponse`] bins arrivals into samples
//! - [`AudioSink`] / [`WavSink`] persist the result

mod batch;
mod config;
mod error;
mod impulse;
mod raypath;
mod simulation;
mod sink;
mod tracer;

pub use batch::{plan_round, run_batch, Batch, BatchResult, DEFAULT_BATCH_SIZE};
pub use config::{BinningMode, ImpulseConfig, Polarity, ReceiverTest, SimulationConfig, TargetKind, TraceConfig};
pub use error::{SinkError, TraceError, TraceResult};
pub use impulse::{normalize, random_sign, Arrival, ImpulseResponse};
pub use raypath::{Intersection, Raypath};
pub use simulation::{simulate, Simulation};
pub use sink::{AudioSink, SampleFormat, WavSink};
pub use tracer::{PathTracer, Sampling, SamplingStats, TraceFailure};

/// Re-export the core model types the tracer API is expressed in.
pub use aural_core::{Layer, LengthUnit, Material, MaterialCatalog, Receiver, Scene, Source};
