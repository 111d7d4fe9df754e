//! Impulse response assembly.
//!
//! Arrivals are sorted by time and binned into a mono sample buffer at the
//! configured sample rate. The buffer is left un-normalized so callers can
//! inspect raw energies; [`ImpulseResponse::normalize`] scales it to a peak
//! of one before it is written out.

use aural_core::{AcousticError, AcousticResult, OctaveBand};
use rand::Rng;

use crate::{AudioSink, BinningMode, ImpulseConfig, Polarity, Raypath, SampleFormat, SinkError};

/// A single path reduced to when it arrives and how strong it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    /// Seconds after emission
    pub time: f64,
    /// Energy left at the reference band, relative to unit emission
    pub energy: f64,
    /// Reflection order of the path
    pub order: usize,
}

impl Arrival {
    pub fn from_path(path: &Raypath, config: &ImpulseConfig, band: OctaveBand) -> Self {
        Self {
            time: path.arrival_time(config.speed_of_sound, config.length_unit),
            energy: path.arrival_energy_in(1.0, band),
            order: path.order(),
        }
    }
}

/// A mono room impulse response.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl ImpulseResponse {
    /// Bin every path into a new impulse response.
    ///
    /// `rng` drives the per-arrival polarity when it is random.
    pub fn assemble<R: Rng + ?Sized>(
        paths: &[Raypath],
        config: &ImpulseConfig,
        rng: &mut R,
    ) -> AcousticResult<Self> {
        config.validate()?;
        let band = OctaveBand::from_hz(config.reference_frequency)?;
        let arrivals = paths
            .iter()
            .map(|path| Arrival::from_path(path, config, band))
            .collect();
        Self::from_arrivals(arrivals, config, rng)
    }

    /// Bin pre-computed arrivals.
    pub fn from_arrivals<R: Rng + ?Sized>(
        mut arrivals: Vec<Arrival>,
        config: &ImpulseConfig,
        rng: &mut R,
    ) -> AcousticResult<Self> {
        config.validate()?;

        // Stable, so equal times keep their sampling order
        arrivals.sort_by(|a, b| a.time.total_cmp(&b.time));

        let last = arrivals.last().ok_or_else(|| {
            AcousticError::InvalidArgument("cannot assemble an impulse response from no arrivals".to_string())
        })?;

        let rate = f64::from(config.sample_rate);
        let mut samples = vec![0.0; sample_index(last.time, rate) + 1];

        for arrival in &arrivals {
            let sign = match config.polarity {
                Polarity::Random => random_sign(rng),
                Polarity::Positive => 1.0,
            };
            let value = sign * arrival.energy;
            let slot = &mut samples[sample_index(arrival.time, rate)];
            match config.binning {
                BinningMode::Overwrite => *slot = value,
                BinningMode::Accumulate => *slot += value,
            }
        }

        Ok(Self {
            samples,
            sample_rate: config.sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    /// Scale the buffer so its peak magnitude is one.
    pub fn normalize(&mut self) {
        normalize(&mut self.samples);
    }

    /// Hand the samples to `sink` as 32-bit floats.
    pub fn write_to(&self, sink: &mut dyn AudioSink, bits_per_sample: u16) -> Result<(), SinkError> {
        let samples: Vec<f32> = self.samples.iter().map(|&s| s as f32).collect();
        sink.write(
            &samples,
            SampleFormat {
                sample_rate: self.sample_rate,
                bits_per_sample,
            },
        )
    }
}

fn sample_index(time: f64, rate: f64) -> usize {
    (time * rate).floor() as usize
}

/// Divide every sample by the buffer's peak magnitude.
///
/// A silent buffer is left untouched.
pub fn normalize(samples: &mut [f64]) {
    let peak = samples.iter().fold(0.0_f64, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        for sample in samples.iter_mut() {
            *sample /= peak;
        }
    }
}

/// A fair coin flip between `1.0` and `-1.0`.
pub fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}
