//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in curtain-core, written against the curtain-hal line and bus traits:
//!
//! - Stepper: ULN2003 board driving a 28BYJ-48 (the curtain motor)
//! - Sensor: BH1750 ambient light sensor over I2C
//! - Input: GPIO push button with optional debouncing

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod input;
pub mod sensor;
pub mod stepper;
