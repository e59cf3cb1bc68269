//! Mock step device for tests and host tooling

use crate::traits::StepDevice;

/// Step-counting mock device
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStepper {
    /// Steps taken forward
    pub forward_steps: u32,
    /// Steps taken backward
    pub backward_steps: u32,
    /// Coil current state
    pub enabled: bool,
}

impl MockStepper {
    /// Net travel in steps (forward minus backward)
    pub fn net_steps(&self) -> i64 {
        self.forward_steps as i64 - self.backward_steps as i64
    }
}

impl StepDevice for MockStepper {
    fn step_forward(&mut self) {
        self.forward_steps += 1;
    }

    fn step_backward(&mut self) {
        self.backward_steps += 1;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
