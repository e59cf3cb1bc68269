//! Dual-wheel drive controller
//!
//! The robot draws with two independently driven wheels. Every move
//! is a pair of straight-line wheel displacements; the controller
//! plans per-wheel speeds so both wheels start and stop at the same
//! wall-clock time, drives both axes to completion, and re-homes the
//! logical positions afterward. There is no absolute position
//! sensing: each completed move redefines "home".
//!
//! Scheduling is single-threaded and cooperative. One tick advances
//! both axes by at most one step each, against the same clock sample;
//! the blocking entry points are conveniences built on the
//! single-tick [`DualDrive::wheels_still_turning`].

use crate::config::DriveConfig;
use crate::motion::axis::StepperAxis;
use crate::motion::plan::plan_speeds;
use crate::session::{DrawEvent, DrawState};
use crate::traits::{Clock, StepDevice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One requested move: two wheel displacements and an optional top
/// speed
///
/// Created per call and consumed immediately; not persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveRequest {
    /// Left wheel travel in millimetres, signed
    pub left_mm: f32,
    /// Right wheel travel in millimetres, signed
    pub right_mm: f32,
    /// Top speed in steps/s; the configured default applies when
    /// absent
    pub top_speed: Option<f32>,
}

impl MoveRequest {
    /// Create a request using the configured default top speed
    pub fn new(left_mm: f32, right_mm: f32) -> Self {
        Self {
            left_mm,
            right_mm,
            top_speed: None,
        }
    }

    /// Set an explicit top speed
    pub fn with_top_speed(mut self, steps_per_second: f32) -> Self {
        self.top_speed = Some(steps_per_second);
        self
    }
}

/// Knob settings captured by the settings collaborator
///
/// Dial values map onto the steps/s domain at ten steps/s per dial
/// unit, capped by the configured ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelSettings {
    /// Left wheel travel in millimetres
    pub left_distance_mm: f32,
    /// Right wheel travel in millimetres
    pub right_distance_mm: f32,
    /// Left speed dial value
    pub left_speed_dial: f32,
    /// Right speed dial value
    pub right_speed_dial: f32,
}

/// Errors that can occur on the drive's command surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// An emergency stop is already in flight
    StopInProgress,
}

/// Dual-wheel drive: two stepper axes moved in lockstep
///
/// Owns both axes by composition; the backend for each wheel is
/// chosen at construction. Axes start with coil current off and are
/// energized immediately before motion begins.
pub struct DualDrive<L, R, C> {
    left: StepperAxis<L>,
    right: StepperAxis<R>,
    config: DriveConfig,
    clock: C,
    session: DrawState,
}

impl<L, R, C> DualDrive<L, R, C>
where
    L: StepDevice,
    R: StepDevice,
    C: Clock,
{
    /// Create a drive over two step devices
    pub fn new(left: L, right: R, config: DriveConfig, clock: C) -> Self {
        let mut left = StepperAxis::new(left);
        let mut right = StepperAxis::new(right);
        setup_axis(&mut left, &config);
        setup_axis(&mut right, &config);

        Self {
            left,
            right,
            config,
            clock,
            session: DrawState::Idle,
        }
    }

    /// Borrow the left axis
    pub fn left(&self) -> &StepperAxis<L> {
        &self.left
    }

    /// Borrow the right axis
    pub fn right(&self) -> &StepperAxis<R> {
        &self.right
    }

    /// The drive configuration
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Current session state
    pub fn session(&self) -> DrawState {
        self.session
    }

    /// Whether a drawing motion is in progress
    ///
    /// External mode loops poll this to decide between feeding
    /// [`DualDrive::wheels_still_turning`] and accepting new
    /// commands.
    pub fn is_drawing(&self) -> bool {
        self.session.is_drawing()
    }

    /// Energize both wheels
    pub fn enable_wheels(&mut self) {
        self.left.enable_outputs();
        self.right.enable_outputs();
    }

    /// De-energize both wheels
    ///
    /// Called by the start-trigger loop while idle; holding current
    /// between moves only heats the drivers.
    pub fn disable_wheels(&mut self) {
        self.left.disable_outputs();
        self.right.disable_outputs();
    }

    /// Configure a move without driving it, at the preview top speed
    pub fn set_wheels_mm(&mut self, left_mm: f32, right_mm: f32) {
        self.set_wheels_mm_at(left_mm, right_mm, self.config.preview_top_speed);
    }

    /// Configure a move without driving it
    ///
    /// Plans per-wheel speeds so both wheels arrive together, sets
    /// absolute step targets, and energizes the wheels. Does not
    /// block; motion happens in subsequent polls.
    pub fn set_wheels_mm_at(&mut self, left_mm: f32, right_mm: f32, top_speed: f32) {
        self.session = self.session.transition(DrawEvent::MoveRequested);

        let plan = plan_speeds(left_mm, right_mm, top_speed);
        let left_steps = self.config.geometry.distance_to_steps(left_mm);
        let right_steps = self.config.geometry.distance_to_steps(right_mm);

        self.enable_wheels();

        self.left.set_max_speed(plan.left);
        self.left.set_acceleration(self.config.instant_acceleration);
        self.left.move_to(left_steps);

        self.right.set_max_speed(plan.right);
        self.right.set_acceleration(self.config.instant_acceleration);
        self.right.move_to(right_steps);

        self.session = self.session.transition(DrawEvent::MoveStarted);
    }

    /// Configure a move from a request value
    pub fn set_wheels(&mut self, request: MoveRequest) {
        let top_speed = request
            .top_speed
            .unwrap_or(self.config.preview_top_speed);
        self.set_wheels_mm_at(request.left_mm, request.right_mm, top_speed);
    }

    /// Drive both wheels the given distances at the default top speed
    pub fn turn_wheels_mm(&mut self, left_mm: f32, right_mm: f32) {
        self.turn_wheels_mm_at(left_mm, right_mm, self.config.default_top_speed);
    }

    /// Drive both wheels the given distances, blocking to completion
    ///
    /// Runs the cooperative tick until both axes report zero distance
    /// to go, then re-homes both logical positions to zero. A wheel
    /// that never arrives (stalled hardware) hangs this loop; the
    /// drive is open-loop and cannot tell.
    pub fn turn_wheels_mm_at(&mut self, left_mm: f32, right_mm: f32, top_speed: f32) {
        self.set_wheels_mm_at(left_mm, right_mm, top_speed);
        while self.wheels_still_turning() {}
    }

    /// Drive a requested move, blocking to completion
    pub fn turn_wheels(&mut self, request: MoveRequest) {
        let top_speed = request
            .top_speed
            .unwrap_or(self.config.default_top_speed);
        self.turn_wheels_mm_at(request.left_mm, request.right_mm, top_speed);
    }

    /// Advance the move by one cooperative tick
    ///
    /// Samples the clock once and advances both axes by at most one
    /// step each against that sample. Returns whether either wheel
    /// still has distance to go; on joint arrival both positions are
    /// re-homed to zero and the session completes. Safe to keep
    /// calling after arrival.
    ///
    /// This is the primary API: a caller's own event loop interleaves
    /// it with button and display polling.
    pub fn wheels_still_turning(&mut self) -> bool {
        let now = self.clock.elapsed();
        if self.left.distance_to_go() != 0 || self.right.distance_to_go() != 0 {
            self.left.run(now);
            self.right.run(now);
            true
        } else {
            self.left.set_current_position(0);
            self.right.set_current_position(0);
            self.session = self.session.transition(DrawEvent::MoveCompleted);
            false
        }
    }

    /// Apply captured knob settings to the axes
    ///
    /// Speed dials map at ten steps/s per unit, capped by the
    /// configured ceiling; distances become absolute step targets.
    /// Motion happens in subsequent polls of
    /// [`DualDrive::wheels_still_turning`].
    pub fn capture_settings(&mut self, settings: &WheelSettings) {
        self.session = self.session.transition(DrawEvent::MoveRequested);

        self.enable_wheels();

        self.left.set_max_speed(
            (settings.left_speed_dial * 10.0).min(self.config.settings_speed_ceiling),
        );
        self.left.set_acceleration(self.config.settings_acceleration);
        self.left
            .move_to(self.config.geometry.distance_to_steps(settings.left_distance_mm));

        self.right.set_max_speed(
            (settings.right_speed_dial * 10.0).min(self.config.settings_speed_ceiling),
        );
        self.right.set_acceleration(self.config.settings_acceleration);
        self.right
            .move_to(self.config.geometry.distance_to_steps(settings.right_distance_mm));

        self.session = self.session.transition(DrawEvent::MoveStarted);
    }

    /// Brake both wheels, re-home, and de-energize
    ///
    /// Retargets both axes to their shortest braking distance, sets
    /// the stop deceleration, and polls to completion. Afterward both
    /// logical positions are zero, coil current is off, and the
    /// session is idle. Blocking; a single stop may be in flight at a
    /// time.
    pub fn stop_and_reset(&mut self) -> Result<(), DriveError> {
        if self.session == DrawState::Stopping {
            return Err(DriveError::StopInProgress);
        }
        self.session = self.session.transition(DrawEvent::StopRequested);

        // Braking targets are computed with the acceleration the move
        // was configured with; the ramp-down itself uses the stop
        // deceleration.
        self.left.stop();
        self.right.stop();
        self.left.set_acceleration(self.config.stop_acceleration);
        self.right.set_acceleration(self.config.stop_acceleration);

        while self.left.distance_to_go() != 0 || self.right.distance_to_go() != 0 {
            let now = self.clock.elapsed();
            self.left.run(now);
            self.right.run(now);
        }

        self.left.set_current_position(0);
        self.right.set_current_position(0);
        self.disable_wheels();

        self.session = self.session.transition(DrawEvent::StopCompleted);
        Ok(())
    }
}

/// Apply construction-time defaults; the wheel starts de-energized
fn setup_axis<D: StepDevice>(axis: &mut StepperAxis<D>, config: &DriveConfig) {
    axis.set_max_speed(config.default_max_speed);
    axis.set_acceleration(config.default_acceleration);
    axis.set_min_pulse_width(config.min_pulse_width_us);
    axis.disable_outputs();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStepper;
    use core::cell::Cell;
    use core::time::Duration;

    /// Tick length for manually stepped clocks
    const TICK_US: u64 = 2_000;

    fn auto_clock() -> impl Fn() -> Duration {
        let now = Cell::new(0u64);
        move || {
            now.set(now.get() + 500);
            Duration::from_micros(now.get())
        }
    }

    fn drive_with_auto_clock(
    ) -> DualDrive<MockStepper, MockStepper, impl Fn() -> Duration> {
        DualDrive::new(
            MockStepper::default(),
            MockStepper::default(),
            DriveConfig::default(),
            auto_clock(),
        )
    }

    #[test]
    fn test_axes_start_disabled() {
        let drive = drive_with_auto_clock();

        assert!(!drive.left().is_enabled());
        assert!(!drive.right().is_enabled());
        assert!(!drive.is_drawing());
    }

    #[test]
    fn test_set_wheels_configures_both_axes() {
        let mut drive = drive_with_auto_clock();

        drive.set_wheels_mm_at(100.0, 50.0, 500.0);

        assert_eq!(drive.left().max_speed(), 500.0);
        assert_eq!(drive.right().max_speed(), 250.0);
        assert_eq!(drive.left().target_position(), 825);
        assert_eq!(drive.right().target_position(), 413);
        assert!(drive.left().is_enabled());
        assert!(drive.right().is_enabled());
        assert_eq!(drive.session(), DrawState::Running);
    }

    #[test]
    fn test_set_wheels_default_uses_preview_speed() {
        let mut drive = drive_with_auto_clock();

        drive.set_wheels_mm(60.0, 60.0);

        assert_eq!(drive.left().max_speed(), 300.0);
        assert_eq!(drive.right().max_speed(), 300.0);
    }

    #[test]
    fn test_speed_defaults_come_from_config() {
        let config = DriveConfig {
            default_top_speed: 220.0,
            preview_top_speed: 120.0,
            ..DriveConfig::default()
        };
        let mut drive = DualDrive::new(
            MockStepper::default(),
            MockStepper::default(),
            config,
            auto_clock(),
        );

        drive.set_wheels_mm(30.0, 30.0);
        assert_eq!(drive.left().max_speed(), 120.0);

        drive.turn_wheels_mm(5.0, 5.0);
        assert_eq!(drive.left().max_speed(), 220.0);
    }

    #[test]
    fn test_turn_wheels_round_trip() {
        let mut drive = drive_with_auto_clock();

        drive.turn_wheels_mm(40.0, -25.0);

        // Both axes arrived and were re-homed to the new reference
        assert_eq!(drive.left().distance_to_go(), 0);
        assert_eq!(drive.right().distance_to_go(), 0);
        assert_eq!(drive.left().current_position(), 0);
        assert_eq!(drive.right().current_position(), 0);
        assert!(!drive.is_drawing());

        // The devices saw the full travel: 40 mm and -25 mm
        assert_eq!(drive.left().device().net_steps(), 330);
        assert_eq!(drive.right().device().net_steps(), -206);
        // Default top speed applied to the dominant wheel
        assert_eq!(drive.left().max_speed(), 500.0);
    }

    #[test]
    fn test_turn_wheels_request_value() {
        let mut drive = drive_with_auto_clock();

        drive.turn_wheels(MoveRequest::new(20.0, 20.0).with_top_speed(350.0));

        assert_eq!(drive.left().max_speed(), 350.0);
        assert_eq!(drive.left().device().net_steps(), 165);
        assert_eq!(drive.right().device().net_steps(), 165);
    }

    #[test]
    fn test_zero_move_is_a_noop() {
        let mut drive = drive_with_auto_clock();

        drive.turn_wheels_mm_at(0.0, 0.0, 500.0);

        // Degenerate plan: both wheels at top speed, nothing to do
        assert_eq!(drive.left().max_speed(), 500.0);
        assert_eq!(drive.right().max_speed(), 500.0);
        assert_eq!(drive.left().device().net_steps(), 0);
        assert_eq!(drive.right().device().net_steps(), 0);
        assert!(!drive.is_drawing());
    }

    #[test]
    fn test_wheels_arrive_on_the_same_tick() {
        // Manually stepped clock: both axes see identical timestamps
        // and we can count ticks to arrival.
        let now_us = Cell::new(0u64);
        let mut drive = DualDrive::new(
            MockStepper::default(),
            MockStepper::default(),
            DriveConfig::default(),
            || Duration::from_micros(now_us.get()),
        );

        drive.set_wheels_mm_at(100.0, 50.0, 500.0);

        let mut tick = 0u32;
        let mut left_done = 0u32;
        let mut right_done = 0u32;
        loop {
            now_us.set(now_us.get() + TICK_US);
            tick += 1;
            assert!(tick < 10_000, "wheels never arrived");

            let turning = drive.wheels_still_turning();
            if left_done == 0 && drive.left().distance_to_go() == 0 {
                left_done = tick;
            }
            if right_done == 0 && drive.right().distance_to_go() == 0 {
                right_done = tick;
            }
            if !turning {
                break;
            }
        }

        // The slowed wheel covers half the steps at half the speed:
        // synchronized arrival within one tick.
        assert!(left_done > 0 && right_done > 0);
        assert!(left_done.abs_diff(right_done) <= 1);

        assert_eq!(drive.left().current_position(), 0);
        assert_eq!(drive.right().current_position(), 0);
        assert!(!drive.is_drawing());
    }

    #[test]
    fn test_polling_after_arrival_is_idempotent() {
        let mut drive = drive_with_auto_clock();

        drive.turn_wheels_mm(10.0, 10.0);
        let left_steps = drive.left().device().forward_steps;

        assert!(!drive.wheels_still_turning());
        assert!(!drive.wheels_still_turning());
        assert_eq!(drive.left().device().forward_steps, left_steps);
        assert_eq!(drive.left().current_position(), 0);
    }

    #[test]
    fn test_capture_settings_applies_dials() {
        let mut drive = drive_with_auto_clock();

        drive.capture_settings(&WheelSettings {
            left_distance_mm: 100.0,
            right_distance_mm: -40.0,
            left_speed_dial: 25.0,
            right_speed_dial: 60.0,
        });

        // Dial values map at x10; the right dial hits the ceiling
        assert_eq!(drive.left().max_speed(), 250.0);
        assert_eq!(drive.right().max_speed(), 400.0);
        assert_eq!(drive.left().acceleration(), 100.0);
        assert_eq!(drive.right().acceleration(), 100.0);
        assert_eq!(drive.left().target_position(), 825);
        assert_eq!(drive.right().target_position(), -330);
        assert!(drive.is_drawing());
    }

    #[test]
    fn test_stop_and_reset_mid_move() {
        let mut drive = drive_with_auto_clock();

        drive.set_wheels_mm_at(100.0, 80.0, 500.0);
        for _ in 0..200 {
            drive.wheels_still_turning();
        }
        assert!(drive.is_drawing());
        assert!(drive.left().current_position() > 0);

        drive.stop_and_reset().unwrap();

        assert!(!drive.is_drawing());
        assert_eq!(drive.session(), DrawState::Idle);
        assert!(!drive.left().is_enabled());
        assert!(!drive.right().is_enabled());
        assert_eq!(drive.left().current_position(), 0);
        assert_eq!(drive.right().current_position(), 0);
        assert_eq!(drive.left().distance_to_go(), 0);
        assert_eq!(drive.right().distance_to_go(), 0);
    }

    #[test]
    fn test_stop_when_idle_is_clean() {
        let mut drive = drive_with_auto_clock();

        drive.stop_and_reset().unwrap();

        assert!(!drive.is_drawing());
        assert!(!drive.left().is_enabled());
        assert_eq!(drive.left().current_position(), 0);
    }

    #[test]
    fn test_stop_brakes_backward_moves_too() {
        // Backward travel has negative distance to go; the stop loop
        // must brake it the same way it brakes forward travel.
        let mut drive = drive_with_auto_clock();

        drive.set_wheels_mm_at(-100.0, -100.0, 500.0);
        for _ in 0..200 {
            drive.wheels_still_turning();
        }
        let travelled = drive.left().device().backward_steps;
        assert!(travelled > 0);

        drive.stop_and_reset().unwrap();

        // Braking continued in the direction of travel
        assert!(drive.left().device().backward_steps > travelled);
        assert_eq!(drive.left().device().forward_steps, 0);
        assert_eq!(drive.left().distance_to_go(), 0);
    }

    #[test]
    fn test_enable_lifecycle_bracket() {
        let mut drive = drive_with_auto_clock();

        drive.enable_wheels();
        assert!(drive.left().is_enabled());
        assert!(drive.right().is_enabled());

        drive.disable_wheels();
        assert!(!drive.left().is_enabled());
        assert!(!drive.right().is_enabled());
    }
}
