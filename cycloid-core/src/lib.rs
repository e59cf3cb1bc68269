//! Board-agnostic motion core for the Cycloid drawing robot
//!
//! This crate contains all drive logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (step device, clock)
//! - Wheel geometry (millimetres to steps)
//! - Speed planning for synchronized dual-wheel arrival
//! - Stepper axis profile driver (speed/acceleration-gated stepping)
//! - Dual-wheel drive controller with emergency stop
//! - Drawing-session state machine
//! - Configuration type definitions

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[cfg(all(not(feature = "std"), test))]
extern crate std;

pub mod config;
pub mod motion;
pub mod session;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
