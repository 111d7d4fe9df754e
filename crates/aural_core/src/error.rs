//! Error types for the acoustic model.

use thiserror::Error;

/// Failures raised by the acoustic model itself.
///
/// Ordinary trace failures (a ray that never reaches the receiver) are not
/// errors and never appear here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcousticError {
    /// A query was made with a value the model cannot answer for, such as an
    /// absorption lookup at a frequency that is not a standard octave band.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A model object was built from values that make it meaningless, such as
    /// a receiver with a non-positive radius.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type AcousticResult<T> = Result<T, AcousticError>;
