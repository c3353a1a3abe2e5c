//! Board-level pin claiming
//!
//! Owns the GPIO controller and hands out configured lines by BCM number,
//! refusing to hand out the same pin twice.

use curtain_core::config::PinConfig;
use log::info;
use rppal::gpio::Gpio;

use crate::error::LinuxHalError;
use crate::gpio::{LinuxInput, LinuxOutput};
use crate::i2c::LinuxI2c;
use crate::pins::{AllocError, GpioAllocator};

/// GPIO header and buses of a Linux SBC
pub struct LinuxBoard {
    gpio: Gpio,
    allocator: GpioAllocator,
}

impl LinuxBoard {
    /// Open the GPIO controller
    pub fn new() -> Result<Self, LinuxHalError> {
        let gpio = Gpio::new()?;
        info!("GPIO controller opened");
        Ok(Self {
            gpio,
            allocator: GpioAllocator::new(),
        })
    }

    /// Claim a pin as an output
    pub fn output(&mut self, config: &PinConfig) -> Result<LinuxOutput, LinuxHalError> {
        let pin = self.claim(config.pin)?;
        Ok(LinuxOutput::new(pin, config.inverted))
    }

    /// Claim a pin as an input
    ///
    /// Polarity is left to the consumer; only the pull resistor is applied.
    pub fn input(&mut self, config: &PinConfig) -> Result<LinuxInput, LinuxHalError> {
        let pin = self.claim(config.pin)?;
        Ok(LinuxInput::new(pin, config.pull_up))
    }

    /// Open an I2C bus
    pub fn i2c(&mut self, bus: u8) -> Result<LinuxI2c, LinuxHalError> {
        LinuxI2c::new(bus)
    }

    fn claim(&mut self, number: u8) -> Result<rppal::gpio::Pin, LinuxHalError> {
        self.allocator.allocate(number).map_err(|e| match e {
            AllocError::InvalidPin(pin) => LinuxHalError::InvalidPin(pin),
            AllocError::InUse(pin) => LinuxHalError::PinInUse(pin),
        })?;
        match self.gpio.get(number) {
            Ok(pin) => Ok(pin),
            Err(e) => {
                self.allocator.release(number);
                Err(e.into())
            }
        }
    }
}
