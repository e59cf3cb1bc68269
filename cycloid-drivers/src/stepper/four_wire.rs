//! Direct four-wire stepper wiring
//!
//! Drives the four coil inputs of an H-bridge pair through digital
//! pins in the full-step sequence. Two coils are energized in every
//! phase; disabling drops all four so the motor neither holds nor
//! heats.

use cycloid_core::traits::StepDevice;
use embedded_hal::digital::OutputPin;

/// Full-step phase sequence, one row per phase, one column per wire
///
/// 0101 -> 0110 -> 1010 -> 1001, the coil pattern the robot's
/// H-bridge wiring expects.
const FULL_STEP_SEQUENCE: [[bool; 4]; 4] = [
    [true, false, true, false],
    [false, true, true, false],
    [false, true, false, true],
    [true, false, false, true],
];

/// Four-wire H-bridge step device
///
/// Pin errors are ignored: the wires are plain GPIO outputs and the
/// step sequence has no way to report a fault upward anyway.
pub struct FourWireStepper<P> {
    pins: [P; 4],
    phase: u8,
    enabled: bool,
}

impl<P: OutputPin> FourWireStepper<P> {
    /// Create a device over the four coil input pins
    ///
    /// Pins are left untouched until the first step or enable call.
    pub fn new(in1: P, in2: P, in3: P, in4: P) -> Self {
        Self {
            pins: [in1, in2, in3, in4],
            phase: 0,
            enabled: false,
        }
    }

    /// Current phase index (0..4)
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Whether the coils are energized
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply_phase(&mut self) {
        let pattern = FULL_STEP_SEQUENCE[self.phase as usize];
        for (pin, high) in self.pins.iter_mut().zip(pattern) {
            if high {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }

    fn all_low(&mut self) {
        for pin in self.pins.iter_mut() {
            pin.set_low().ok();
        }
    }
}

impl<P: OutputPin> StepDevice for FourWireStepper<P> {
    fn step_forward(&mut self) {
        self.phase = (self.phase + 1) % 4;
        self.apply_phase();
    }

    fn step_backward(&mut self) {
        self.phase = (self.phase + 3) % 4;
        self.apply_phase();
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            // Re-energize the coils for the phase we stopped in so
            // the rotor does not jump on the next step
            self.apply_phase();
        } else {
            self.all_low();
        }
    }
}

/// Cell-backed pin for observing coil state in tests
#[cfg(test)]
pub(crate) struct TestPin<'a>(pub &'a core::cell::Cell<bool>);

#[cfg(test)]
impl embedded_hal::digital::ErrorType for TestPin<'_> {
    type Error = core::convert::Infallible;
}

#[cfg(test)]
impl OutputPin for TestPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}
