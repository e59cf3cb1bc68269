//! Step device trait
//!
//! This trait abstracts over the two motor interfaces found on the
//! robot's hardware revisions: a directly wired four-wire H-bridge
//! quad, or a step-callback pair bound to an external motor-shield
//! library. The axis profile driver only ever asks for one step at a
//! time and for coil current to be switched on or off.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wheel rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Toward more positive step positions
    Forward,
    /// Toward more negative step positions
    Backward,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Trait for step-generating motor interfaces
///
/// Implementations advance the motor by exactly one step per call.
/// Step timing is owned by the caller (the axis profile driver); a
/// device must not block or sleep.
pub trait StepDevice {
    /// Take one step forward
    fn step_forward(&mut self);

    /// Take one step backward
    fn step_backward(&mut self);

    /// Switch coil current on or off
    ///
    /// When disabled, the motor is free to rotate and does not hold
    /// position. Devices without their own current control (shield
    /// libraries that energize coils per step) may treat this as a
    /// no-op.
    fn set_enabled(&mut self, enabled: bool);

    /// Take one step in the given direction
    fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.step_forward(),
            Direction::Backward => self.step_backward(),
        }
    }
}
