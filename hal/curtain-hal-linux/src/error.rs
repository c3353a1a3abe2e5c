//! HAL error type

use thiserror::Error;

/// Errors from the Linux GPIO and I2C layer
#[derive(Debug, Error)]
pub enum LinuxHalError {
    /// GPIO character device or pin setup failed
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    /// I2C device open or transfer failed
    #[error("I2C error: {0}")]
    I2c(#[from] rppal::i2c::Error),

    /// Pin number outside the header
    #[error("gpio{0} does not exist")]
    InvalidPin(u8),

    /// Pin claimed twice
    #[error("gpio{0} is already in use")]
    PinInUse(u8),

    /// Read from an input after it was released
    #[error("gpio{0} has been released")]
    Released(u8),

    /// Device accepted fewer bytes than requested
    #[error("short I2C transfer: {done} of {expected} bytes")]
    ShortTransfer { done: usize, expected: usize },
}
