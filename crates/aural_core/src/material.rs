//! Acoustic surface materials.
//!
//! Absorption is tabulated at the seven standard octave bands
//! |125|250|500|1k|2k|4k|8k| Hz. Lookups at any other frequency are rejected
//! rather than interpolated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AcousticError, AcousticResult};

/// One of the seven octave bands absorption is tabulated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OctaveBand {
    Hz125,
    Hz250,
    Hz500,
    Hz1000,
    Hz2000,
    Hz4000,
    Hz8000,
}

impl OctaveBand {
    /// All bands, lowest first. The order matches `Material::absorption`.
    pub const ALL: [OctaveBand; 7] = [
        OctaveBand::Hz125,
        OctaveBand::Hz250,
        OctaveBand::Hz500,
        OctaveBand::Hz1000,
        OctaveBand::Hz2000,
        OctaveBand::Hz4000,
        OctaveBand::Hz8000,
    ];

    /// Bands averaged for the noise reduction coefficient.
    pub const NRC_BANDS: [OctaveBand; 4] = [
        OctaveBand::Hz250,
        OctaveBand::Hz500,
        OctaveBand::Hz1000,
        OctaveBand::Hz2000,
    ];

    /// Resolve an exact centre frequency in Hz.
    pub fn from_hz(hz: u32) -> AcousticResult<Self> {
        Self::ALL
            .into_iter()
            .find(|band| band.hz() == hz)
            .ok_or_else(|| {
                AcousticError::InvalidArgument(format!(
                    "{hz} Hz is not a standard octave band (125, 250, 500, 1000, 2000, 4000, 8000)"
                ))
            })
    }

    /// Centre frequency in Hz.
    pub fn hz(self) -> u32 {
        match self {
            OctaveBand::Hz125 => 125,
            OctaveBand::Hz250 => 250,
            OctaveBand::Hz500 => 500,
            OctaveBand::Hz1000 => 1000,
            OctaveBand::Hz2000 => 2000,
            OctaveBand::Hz4000 => 4000,
            OctaveBand::Hz8000 => 8000,
        }
    }

    /// Position of this band in an absorption spectrum.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u32> for OctaveBand {
    type Error = AcousticError;

    fn try_from(hz: u32) -> AcousticResult<Self> {
        Self::from_hz(hz)
    }
}

impl fmt::Display for OctaveBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// A surface material with its absorption spectrum.
///
/// Coefficients are the fraction of incident energy absorbed per reflection
/// and are expected to lie in [0, 1]; `validate` checks that, construction
/// does not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name
    pub name: String,

    /// Catalogue code of the material in its data source
    pub code: u32,

    /// Absorption coefficients at 125, 250, 500, 1k, 2k, 4k and 8k Hz
    pub absorption: [f64; 7],

    /// Where the coefficients come from (publication, manufacturer sheet, ...)
    #[serde(default)]
    pub source: String,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        code: u32,
        absorption: [f64; 7],
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            absorption,
            source: source.into(),
        }
    }

    /// Check every coefficient is a finite value in [0, 1].
    pub fn validate(&self) -> AcousticResult<()> {
        for band in OctaveBand::ALL {
            let alpha = self.absorption[band.index()];
            if !(0.0..=1.0).contains(&alpha) {
                return Err(AcousticError::InvalidConfiguration(format!(
                    "material '{}' has absorption {alpha} at {band}; expected a value in [0, 1]",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Absorption coefficient at an exact octave-band frequency in Hz.
    pub fn absorption_at(&self, hz: u32) -> AcousticResult<f64> {
        OctaveBand::from_hz(hz).map(|band| self.absorption_in(band))
    }

    #[inline]
    pub fn absorption_in(&self, band: OctaveBand) -> f64 {
        self.absorption[band.index()]
    }

    /// Noise reduction coefficient: mean absorption over 250-2000 Hz.
    pub fn nrc(&self) -> f64 {
        let bands = OctaveBand::NRC_BANDS;
        bands.iter().map(|b| self.absorption_in(*b)).sum::<f64>() / bands.len() as f64
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Material: {} (code {})", self.name, self.code)?;
        if !self.source.is_empty() {
            writeln!(f, "  source: {}", self.source)?;
        }
        for band in OctaveBand::ALL {
            writeln!(f, "  {:>7}: {:.2}", band.to_string(), self.absorption_in(band))?;
        }
        write!(f, "  NRC: {:.3}", self.nrc())
    }
}
