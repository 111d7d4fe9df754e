//! Audio output.

use std::path::{Path, PathBuf};

use log::info;

use crate::SinkError;

/// Target sample rate and PCM bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

/// Something that can persist a mono buffer of amplitudes in `[-1, 1]`.
pub trait AudioSink {
    fn write(&mut self, samples: &[f32], format: SampleFormat) -> Result<(), SinkError>;
}

/// Writes integer PCM WAV files.
#[derive(Debug, Clone)]
pub struct WavSink {
    path: PathBuf,
}

impl WavSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AudioSink for WavSink {
    fn write(&mut self, samples: &[f32], format: SampleFormat) -> Result<(), SinkError> {
        let bits = format.bits_per_sample;
        if !matches!(bits, 8 | 16 | 24 | 32) {
            return Err(SinkError::InvalidFormat(format!(
                "{bits}-bit PCM is not supported (use 8, 16, 24 or 32)"
            )));
        }
        if format.sample_rate == 0 {
            return Err(SinkError::InvalidFormat("sample rate must be positive".to_string()));
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: format.sample_rate,
            bits_per_sample: bits,
            sample_format: hound::SampleFormat::Int,
        };

        // Full scale is symmetric so -1.0 and 1.0 map to equal magnitudes
        let full_scale = ((1_i64 << (bits - 1)) - 1) as f64;

        let mut writer = hound::WavWriter::create(&self.path, spec)?;
        for &sample in samples {
            let value = (f64::from(sample.clamp(-1.0, 1.0)) * full_scale).round() as i32;
            writer.write_sample(value)?;
        }
        writer.finalize()?;

        info!(
            "Wrote {} samples ({} Hz, {}-bit) to {}",
            samples.len(),
            format.sample_rate,
            bits,
            self.path.display()
        );
        Ok(())
    }
}
