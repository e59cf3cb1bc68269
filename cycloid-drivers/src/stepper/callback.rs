//! Step-callback stepper backend
//!
//! The older hardware revision routes its motors through a shield
//! library; stepping is a pair of forward/backward callbacks bound at
//! construction. Coil current is owned by the shield (it energizes
//! per step), so enable/disable is a no-op here.

use cycloid_core::traits::StepDevice;

/// Step device backed by a forward/backward callback pair
pub struct CallbackStepper<F, B> {
    forward: F,
    backward: B,
}

impl<F, B> CallbackStepper<F, B>
where
    F: FnMut(),
    B: FnMut(),
{
    /// Create a device from the two step callbacks
    ///
    /// Wiring quirks (a motor mounted mirrored, for instance) are
    /// handled by swapping what the callbacks do, not here.
    pub fn new(forward: F, backward: B) -> Self {
        Self { forward, backward }
    }
}

impl<F, B> StepDevice for CallbackStepper<F, B>
where
    F: FnMut(),
    B: FnMut(),
{
    fn step_forward(&mut self) {
        (self.forward)();
    }

    fn step_backward(&mut self) {
        (self.backward)();
    }

    fn set_enabled(&mut self, _enabled: bool) {}
}
