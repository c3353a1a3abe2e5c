//! GPIO lines backed by the rppal character-device driver
//!
//! Lines are configured when they are created. An output starts driven to
//! its inactive level; an input gets its pull resistor applied up front.

use curtain_hal::{InputPin, OutputPin};
use log::debug;

use crate::error::LinuxHalError;

/// Output line
pub struct LinuxOutput {
    pin: rppal::gpio::OutputPin,
    number: u8,
    /// Drive the electrical level opposite to the logical one
    inverted: bool,
    /// Logical level last written
    high: bool,
}

impl LinuxOutput {
    pub(crate) fn new(pin: rppal::gpio::Pin, inverted: bool) -> Self {
        let number = pin.pin();
        let pin = if inverted {
            pin.into_output_high()
        } else {
            pin.into_output_low()
        };
        debug!("gpio{} configured as output", number);
        Self {
            pin,
            number,
            inverted,
            high: false,
        }
    }

    /// BCM pin number
    pub fn number(&self) -> u8 {
        self.number
    }
}

impl OutputPin for LinuxOutput {
    type Error = LinuxHalError;

    fn set_high(&mut self) -> Result<(), LinuxHalError> {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), LinuxHalError> {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        self.high = false;
        Ok(())
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input line
///
/// Releasing drops the rppal pin, which returns it to its previous mode.
pub struct LinuxInput {
    pin: Option<rppal::gpio::InputPin>,
    number: u8,
}

impl LinuxInput {
    pub(crate) fn new(pin: rppal::gpio::Pin, pull_up: bool) -> Self {
        let number = pin.pin();
        let pin = if pull_up {
            pin.into_input_pullup()
        } else {
            pin.into_input()
        };
        debug!(
            "gpio{} configured as input{}",
            number,
            if pull_up { " with pull-up" } else { "" }
        );
        Self {
            pin: Some(pin),
            number,
        }
    }

    /// BCM pin number
    pub fn number(&self) -> u8 {
        self.number
    }
}

impl InputPin for LinuxInput {
    type Error = LinuxHalError;

    fn is_high(&mut self) -> Result<bool, LinuxHalError> {
        self.pin
            .as_ref()
            .map(|pin| pin.is_high())
            .ok_or(LinuxHalError::Released(self.number))
    }

    fn release(&mut self) -> Result<(), LinuxHalError> {
        if self.pin.take().is_some() {
            debug!("gpio{} released", self.number);
        }
        Ok(())
    }
}
