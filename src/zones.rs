//! Pitch zone bucketing
//!
//! Splits the length of the pitch into five fixed bands. Bands are half-open
//! on the right except the last one, which also includes x = 100.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalysisError;

/// Lower pitch bound
pub const PITCH_MIN: f64 = 0.0;
/// Upper pitch bound
pub const PITCH_MAX: f64 = 100.0;

/// Named band over the x-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchZone {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
}

impl PitchZone {
    /// All zones in pitch order
    pub const ALL: [PitchZone; 5] = [
        PitchZone::FarLeft,
        PitchZone::Left,
        PitchZone::Center,
        PitchZone::Right,
        PitchZone::FarRight,
    ];

    /// Bucket an x coordinate into its zone
    pub fn from_x(x: f64) -> Result<PitchZone, AnalysisError> {
        if !(PITCH_MIN..=PITCH_MAX).contains(&x) {
            return Err(AnalysisError::out_of_range("x", x, PITCH_MIN, PITCH_MAX));
        }

        // Highest band whose lower bound x reaches; FarLeft starts at PITCH_MIN
        let zone = PitchZone::ALL
            .iter()
            .rev()
            .find(|zone| x >= zone.lower_bound())
            .copied()
            .unwrap_or(PitchZone::FarLeft);
        Ok(zone)
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            PitchZone::FarLeft => "Far Left",
            PitchZone::Left => "Left",
            PitchZone::Center => "Center",
            PitchZone::Right => "Right",
            PitchZone::FarRight => "Far Right",
        }
    }

    /// Inclusive lower bound of the band
    pub fn lower_bound(&self) -> f64 {
        match self {
            PitchZone::FarLeft => PITCH_MIN,
            PitchZone::Left => 20.0,
            PitchZone::Center => 40.0,
            PitchZone::Right => 60.0,
            PitchZone::FarRight => 80.0,
        }
    }

    /// Position of the zone in `ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for PitchZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
