//! Configuration type definitions
//!
//! Drive tunables with the defaults the robot ships with. Callers
//! that need different wheel geometry or speed limits construct a
//! [`DriveConfig`] and hand it to the drive at setup; nothing here is
//! read from storage at this layer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::geometry::WheelGeometry;

/// Drive configuration
///
/// Speeds are in steps per second, accelerations in steps per second
/// squared. The two top-speed defaults differ on purpose: free-run
/// moves tolerate sudden starts and stops, while the settings-preview
/// path runs slower for precision.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    /// Wheel geometry for distance conversion
    pub geometry: WheelGeometry,
    /// Top speed for `turn_wheels_mm` when none is given
    pub default_top_speed: f32,
    /// Top speed for `set_wheels_mm` when none is given
    pub preview_top_speed: f32,
    /// Acceleration for free-run moves (large enough to be instant)
    pub instant_acceleration: f32,
    /// Acceleration for captured-settings moves
    pub settings_acceleration: f32,
    /// Deceleration applied by the emergency stop
    pub stop_acceleration: f32,
    /// Ceiling for the dial-to-speed mapping in `capture_settings`
    pub settings_speed_ceiling: f32,
    /// Per-axis max speed at construction
    pub default_max_speed: f32,
    /// Per-axis acceleration at construction
    pub default_acceleration: f32,
    /// Minimum step pulse width in microseconds
    pub min_pulse_width_us: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            geometry: WheelGeometry::default(),
            default_top_speed: 500.0,
            preview_top_speed: 300.0,
            instant_acceleration: 100_000.0,
            settings_acceleration: 100.0,
            stop_acceleration: 200.0,
            settings_speed_ceiling: 400.0,
            default_max_speed: 400.0,
            default_acceleration: 100.0,
            min_pulse_width_us: 15,
        }
    }
}
