//! Hardware abstraction traits
//!
//! These traits define the interface between the drive logic
//! and hardware-specific implementations.

pub mod clock;
pub mod stepper;

pub use clock::Clock;
pub use stepper::{Direction, StepDevice};

#[cfg(feature = "std")]
pub use clock::OsClock;
