//! Stepper axis profile driver
//!
//! Drives a single [`StepDevice`] toward an absolute step target with
//! speed- and acceleration-gated step generation. The axis never
//! blocks: [`StepperAxis::run`] takes at most one step per call and is
//! meant to be polled from a cooperative control loop, fed the same
//! timestamp as its sibling axis so both advance against identical
//! wall-clock time.
//!
//! Position is dead-reckoned from emitted steps. Stepper motors are an
//! open-loop system; there is no guarantee the wheel is actually
//! there.

use core::time::Duration;

use crate::traits::{Direction, StepDevice};

/// Single stepper axis with position tracking and a speed profile
///
/// Speed ramps linearly in time toward the configured maximum while
/// distance remains, and the axis cruises until arrival. After
/// [`StepperAxis::stop`] the axis brakes: speed ramps down at the
/// configured acceleration toward a floor low enough to always reach
/// the braking target.
#[derive(Debug)]
pub struct StepperAxis<D> {
    device: D,
    /// Current logical position in steps
    position: i64,
    /// Absolute target position in steps
    target: i64,
    /// Cruise speed ceiling in steps/s
    max_speed: f32,
    /// Ramp rate in steps/s²
    acceleration: f32,
    /// Current speed magnitude in steps/s
    speed: f32,
    /// Minimum step pulse width in microseconds; floors the step interval
    min_pulse_us: u32,
    /// Timestamp of the most recent step
    last_step_at: Duration,
    /// Timestamp of the most recent speed update
    last_ramp_at: Duration,
    /// Ramp/step timestamps are valid for the move in progress
    anchored: bool,
    /// Braking toward a stop target
    halting: bool,
    /// Coil current is on
    enabled: bool,
}

impl<D: StepDevice> StepperAxis<D> {
    /// Create an axis over a step device
    ///
    /// Speed and acceleration start at a conservative 1 step/s and
    /// 1 step/s²; callers configure real values before moving. The
    /// device is left untouched until outputs are enabled or the
    /// first step fires.
    pub fn new(device: D) -> Self {
        Self {
            device,
            position: 0,
            target: 0,
            max_speed: 1.0,
            acceleration: 1.0,
            speed: 0.0,
            min_pulse_us: 0,
            last_step_at: Duration::ZERO,
            last_ramp_at: Duration::ZERO,
            anchored: false,
            halting: false,
            enabled: false,
        }
    }

    /// Set the cruise speed ceiling in steps/s
    ///
    /// Lowering it below the current speed takes effect on the next
    /// poll. Zero is allowed and means the axis will not step.
    pub fn set_max_speed(&mut self, steps_per_second: f32) {
        debug_assert!(steps_per_second >= 0.0);
        self.max_speed = steps_per_second;
    }

    /// Get the cruise speed ceiling
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Set the ramp rate in steps/s²
    pub fn set_acceleration(&mut self, steps_per_second2: f32) {
        debug_assert!(steps_per_second2 > 0.0);
        self.acceleration = steps_per_second2;
    }

    /// Get the ramp rate
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Set the minimum step pulse width in microseconds
    ///
    /// The step interval never drops below this, bounding the step
    /// rate a device can be asked for.
    pub fn set_min_pulse_width(&mut self, us: u32) {
        self.min_pulse_us = us;
    }

    /// Set an absolute target position in steps
    ///
    /// Does not block and does not step; motion happens in subsequent
    /// [`StepperAxis::run`] calls. Retargeting mid-move keeps the
    /// current speed.
    pub fn move_to(&mut self, absolute: i64) {
        self.target = absolute;
    }

    /// Set a target relative to the current position
    pub fn move_by(&mut self, delta: i64) {
        self.move_to(self.position + delta);
    }

    /// Get the most recently set target position
    pub fn target_position(&self) -> i64 {
        self.target
    }

    /// Get the current position, as counted from emitted steps
    pub fn current_position(&self) -> i64 {
        self.position
    }

    /// Re-home: the current location becomes `position`
    ///
    /// Also cancels any remaining motion; target and position are
    /// always rebound together so the axis comes to rest.
    pub fn set_current_position(&mut self, position: i64) {
        self.position = position;
        self.target = position;
        self.speed = 0.0;
        self.anchored = false;
        self.halting = false;
    }

    /// Steps remaining to the target; sign indicates direction
    pub fn distance_to_go(&self) -> i64 {
        self.target - self.position
    }

    /// Whether a move is in progress
    pub fn is_moving(&self) -> bool {
        self.position != self.target
    }

    /// Current speed magnitude in steps/s
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Retarget to the nearest point the axis can brake to
    ///
    /// Sets a target `v²/2a + 1` steps ahead in the direction of
    /// travel and ramps speed down on subsequent polls. A stationary
    /// axis is rebound to its current position, cancelling any
    /// pending move.
    pub fn stop(&mut self) {
        let distance = self.distance_to_go();
        if self.speed > 0.0 && distance != 0 {
            let braking = (self.speed * self.speed / (2.0 * self.acceleration)) as i64 + 1;
            self.target = self.position + if distance > 0 { braking } else { -braking };
            self.halting = true;
        } else {
            self.target = self.position;
        }
    }

    /// Switch coil current on
    pub fn enable_outputs(&mut self) {
        self.enabled = true;
        self.device.set_enabled(true);
    }

    /// Switch coil current off
    pub fn disable_outputs(&mut self) {
        self.enabled = false;
        self.device.set_enabled(false);
    }

    /// Whether coil current is on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Borrow the underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably borrow the underlying device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consume the axis, returning the device
    pub fn into_device(self) -> D {
        self.device
    }

    /// Poll the axis, stepping the device if a step is due
    ///
    /// Takes at most one step per call, gated by the current speed
    /// and the time since the previous step. Returns whether the axis
    /// still has distance to go. Polling an idle axis is a no-op.
    ///
    /// The first poll of a fresh move only anchors the internal
    /// timers; stale timestamps from a previous move must not count
    /// as elapsed ramp time.
    pub fn run(&mut self, now: Duration) -> bool {
        if self.position == self.target {
            self.settle();
            return false;
        }

        if !self.anchored {
            self.anchored = true;
            self.last_ramp_at = now;
            self.last_step_at = now;
            return true;
        }

        self.update_speed(now);

        if self.speed > 0.0 && now.saturating_sub(self.last_step_at) >= self.step_interval() {
            let direction = if self.target > self.position {
                Direction::Forward
            } else {
                Direction::Backward
            };
            self.position += match direction {
                Direction::Forward => 1,
                Direction::Backward => -1,
            };
            self.device.step(direction);
            self.last_step_at = now;
        }

        if self.position == self.target {
            self.settle();
            false
        } else {
            true
        }
    }

    /// Come to rest at the current position
    fn settle(&mut self) {
        self.speed = 0.0;
        self.anchored = false;
        self.halting = false;
    }

    /// Ramp the current speed for the elapsed time since the last poll
    fn update_speed(&mut self, now: Duration) {
        let dt = now.saturating_sub(self.last_ramp_at).as_secs_f32();
        self.last_ramp_at = now;
        let delta = self.acceleration * dt;

        if self.halting {
            // Brake, but never below the speed that still reaches the
            // braking target within about one step of travel.
            let floor = libm::sqrtf(2.0 * self.acceleration).min(self.max_speed);
            if self.speed > floor {
                self.speed = (self.speed - delta).max(floor);
            }
        } else if self.speed < self.max_speed {
            self.speed = (self.speed + delta).min(self.max_speed);
        } else {
            self.speed = self.max_speed;
        }
    }

    /// Interval between steps at the current speed, floored by the
    /// minimum pulse width
    fn step_interval(&self) -> Duration {
        let us = (1_000_000.0 / self.speed) as u64;
        Duration::from_micros(us.max(self.min_pulse_us as u64))
    }
}
