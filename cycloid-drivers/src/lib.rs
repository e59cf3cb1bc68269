//! Step-device backend implementations
//!
//! This crate provides concrete implementations of the
//! [`cycloid_core::traits::StepDevice`] seam for the robot's two
//! hardware revisions:
//!
//! - Four-wire H-bridge wiring driven directly over digital pins
//! - Step-callback pairs bound to an external motor-shield library
//!
//! The backend for each wheel is chosen at construction via
//! [`stepper::MotorBackend`].

#![no_std]
#![deny(unsafe_code)]

pub mod stepper;
