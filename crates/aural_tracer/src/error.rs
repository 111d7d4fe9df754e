//! Error types for tracing and output.

use aural_core::AcousticError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    /// The attempt budget ran out before enough paths reached the receiver.
    #[error("sampling exhausted: found {found} of {target} paths after {attempts} attempts")]
    SamplingExhausted {
        found: usize,
        target: usize,
        attempts: u64,
    },

    #[error(transparent)]
    Acoustic(#[from] AcousticError),

    #[error("audio sink error: {0}")]
    Sink(#[from] SinkError),
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Errors raised while persisting an impulse response.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("unsupported sample format: {0}")]
    InvalidFormat(String),
}
