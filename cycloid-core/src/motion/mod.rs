//! Motion control
//!
//! Wheel geometry, synchronized speed planning, the stepper axis
//! profile driver, and the dual-wheel drive controller.

pub mod axis;
pub mod drive;
pub mod geometry;
pub mod plan;

pub use axis::StepperAxis;
pub use drive::{DriveError, DualDrive, MoveRequest, WheelSettings};
pub use geometry::WheelGeometry;
pub use plan::{plan_speeds, SpeedPlan};
