//! Stepper backend implementations
//!
//! One wheel, one backend. The robot's hardware revisions differ in
//! how a step reaches the motor; [`MotorBackend`] is the tagged
//! choice made at construction time.

pub mod callback;
pub mod four_wire;

pub use callback::CallbackStepper;
pub use four_wire::FourWireStepper;

use cycloid_core::traits::StepDevice;
use embedded_hal::digital::OutputPin;

/// Motor interface, selected per hardware revision
///
/// Newer boards wire the H-bridge inputs straight to GPIO
/// ([`FourWireStepper`]); older boards go through a motor-shield
/// library via a callback pair ([`CallbackStepper`]). The drive is
/// agnostic: both are [`StepDevice`]s.
pub enum MotorBackend<P, F, B> {
    /// Direct four-wire H-bridge wiring
    FourWire(FourWireStepper<P>),
    /// Step callbacks bound to an external motor library
    Callback(CallbackStepper<F, B>),
}

impl<P, F, B> MotorBackend<P, F, B>
where
    P: OutputPin,
    F: FnMut(),
    B: FnMut(),
{
    /// Select the four-wire backend
    pub fn four_wire(in1: P, in2: P, in3: P, in4: P) -> Self {
        MotorBackend::FourWire(FourWireStepper::new(in1, in2, in3, in4))
    }

    /// Select the callback backend
    pub fn callback(forward: F, backward: B) -> Self {
        MotorBackend::Callback(CallbackStepper::new(forward, backward))
    }
}

impl<P, F, B> StepDevice for MotorBackend<P, F, B>
where
    P: OutputPin,
    F: FnMut(),
    B: FnMut(),
{
    fn step_forward(&mut self) {
        match self {
            MotorBackend::FourWire(stepper) => stepper.step_forward(),
            MotorBackend::Callback(stepper) => stepper.step_forward(),
        }
    }

    fn step_backward(&mut self) {
        match self {
            MotorBackend::FourWire(stepper) => stepper.step_backward(),
            MotorBackend::Callback(stepper) => stepper.step_backward(),
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        match self {
            MotorBackend::FourWire(stepper) => stepper.set_enabled(enabled),
            MotorBackend::Callback(stepper) => stepper.set_enabled(enabled),
        }
    }
}
