//! Wheel geometry
//!
//! The robot draws by rolling: linear distance on paper is wheel
//! circumference, and wheel rotation is stepper steps. This module
//! owns that conversion.

use core::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wheel geometry for distance conversion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelGeometry {
    /// Stepper steps per full wheel revolution
    pub steps_per_rev: u32,
    /// Wheel diameter in millimetres
    pub wheel_diameter_mm: f32,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            // 28BYJ-48 geared stepper, full-step
            steps_per_rev: 2048,
            wheel_diameter_mm: 79.0,
        }
    }
}

impl WheelGeometry {
    /// Millimetres of travel per full wheel revolution
    pub fn mm_per_rev(&self) -> f32 {
        self.wheel_diameter_mm * PI
    }

    /// Convert a linear distance to a signed step count
    ///
    /// Inputs must be finite; the caller validates. Rounds to the
    /// nearest step, half away from zero, so the conversion is odd:
    /// `distance_to_steps(-x) == -distance_to_steps(x)`.
    pub fn distance_to_steps(&self, distance_mm: f32) -> i64 {
        libm::roundf(distance_mm * self.steps_per_rev as f32 / self.mm_per_rev()) as i64
    }
}
