//! Simulation configuration.

use aural_core::{AcousticError, AcousticResult, LengthUnit, OctaveBand, SamplingStrategy};
use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_BATCH_SIZE;

/// What `ray_count` counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Keep sampling until `ray_count` paths reach the receiver.
    #[default]
    SuccessfulHits,
    /// Cast exactly `ray_count` rays and keep whatever reached the receiver.
    AttemptBudget,
}

/// How the receiver sphere is tested before a ray is allowed to terminate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverTest {
    /// Infinite-line test, capture at the smaller absolute root. A receiver
    /// behind the ray origin still counts.
    #[default]
    Line,
    /// Only the forward half of the ray counts.
    ForwardRay,
}

/// How arrivals that land on the same sample are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningMode {
    /// The later arrival (in sorted order) replaces the earlier one.
    #[default]
    Overwrite,
    /// Colliding arrivals are summed.
    Accumulate,
}

/// Sign given to each arrival when binned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Fair coin flip per arrival.
    #[default]
    Random,
    /// Always positive.
    Positive,
}

/// Ray sampling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Number of paths (or rays, see `target_kind`) to sample
    pub ray_count: usize,
    /// Maximum number of bounces before a ray is abandoned
    pub max_order: u32,
    /// Total rays that may be cast before sampling gives up
    pub max_attempts: u64,
    /// Transparent markers a single segment may pass through
    pub max_marker_skips: u32,
    pub target_kind: TargetKind,
    pub sampling: SamplingStrategy,
    pub receiver_test: ReceiverTest,
    /// Paths per parallel batch
    pub batch_size: usize,
    /// Base seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            ray_count: 1000,
            max_order: 50,
            max_attempts: 1_000_000,
            max_marker_skips: 64,
            target_kind: TargetKind::SuccessfulHits,
            sampling: SamplingStrategy::Cube,
            receiver_test: ReceiverTest::Line,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> AcousticResult<()> {
        if self.batch_size == 0 {
            return Err(AcousticError::InvalidConfiguration(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Impulse response assembly configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpulseConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Speed of sound in m/s
    pub speed_of_sound: f64,
    /// Unit the room geometry is modelled in
    pub length_unit: LengthUnit,
    /// Octave band (Hz) arrival energies are evaluated at
    pub reference_frequency: u32,
    pub binning: BinningMode,
    pub polarity: Polarity,
    /// PCM bit depth of the written file
    pub bits_per_sample: u16,
}

impl Default for ImpulseConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            speed_of_sound: 343.0,
            length_unit: LengthUnit::Inches,
            reference_frequency: 1000,
            binning: BinningMode::Overwrite,
            polarity: Polarity::Random,
            bits_per_sample: 16,
        }
    }
}

impl ImpulseConfig {
    pub fn validate(&self) -> AcousticResult<()> {
        if self.sample_rate == 0 {
            return Err(AcousticError::InvalidConfiguration(
                "sample_rate must be positive".to_string(),
            ));
        }
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Err(AcousticError::InvalidConfiguration(format!(
                "speed_of_sound must be positive, got {}",
                self.speed_of_sound
            )));
        }
        OctaveBand::from_hz(self.reference_frequency)?;
        Ok(())
    }
}

/// Everything a simulation run needs besides the room itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub trace: TraceConfig,
    pub impulse: ImpulseConfig,
}
