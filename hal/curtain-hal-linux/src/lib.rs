//! Linux single-board computer HAL for the smart curtain controller
//!
//! Implements the curtain-hal traits on top of `rppal`:
//! - Output and input lines on the BCM GPIO header
//! - I2C bus master
//! - Pin allocation and config-string parsing
//!
//! Blocking delays come straight from `rppal::hal::Delay`, which already
//! implements `embedded_hal::delay::DelayNs`.

#![deny(unsafe_code)]

pub mod board;
pub mod error;
pub mod gpio;
pub mod i2c;
pub mod pins;

pub use board::LinuxBoard;
pub use error::LinuxHalError;
pub use gpio::{LinuxInput, LinuxOutput};
pub use i2c::LinuxI2c;
pub use rppal::hal::Delay;
