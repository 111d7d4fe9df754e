//! Model length units.

use serde::{Deserialize, Serialize};

/// Unit the room geometry is modelled in.
///
/// Path lengths are accumulated in model units and only converted to metres
/// when an arrival time is computed against a speed of sound in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    #[default]
    Inches,
    Feet,
    Centimeters,
    Meters,
}

impl LengthUnit {
    /// Length of one model unit in metres.
    pub fn meters_per_unit(self) -> f64 {
        match self {
            LengthUnit::Inches => 0.0254,
            LengthUnit::Feet => 0.3048,
            LengthUnit::Centimeters => 0.01,
            LengthUnit::Meters => 1.0,
        }
    }

    /// Convert a model-space length to metres.
    #[inline]
    pub fn to_meters(self, length: f64) -> f64 {
        length * self.meters_per_unit()
    }
}
