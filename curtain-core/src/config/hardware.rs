//! Hardware configuration types
//!
//! Pin assignments for the ULN2003 inputs and the two buttons, plus the
//! bus location of the light sensor.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{ConfigError, ControllerConfig, MotorConfig};
use crate::motion::LINE_COUNT;

/// I2C address of a BH1750 with ADDR tied low
pub const DEFAULT_LIGHT_SENSOR_ADDRESS: u8 = 0x23;

/// I2C bus the light sensor sits on
pub const DEFAULT_LIGHT_SENSOR_BUS: u8 = 1;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PinConfig {
    /// GPIO number (BCM numbering on the Linux host)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Active-low button wired to ground with the internal pull-up
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Light sensor bus location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightSensorHwConfig {
    /// I2C bus number
    pub bus: u8,
    /// 7-bit device address
    pub address: u8,
}

impl Default for LightSensorHwConfig {
    fn default() -> Self {
        Self {
            bus: DEFAULT_LIGHT_SENSOR_BUS,
            address: DEFAULT_LIGHT_SENSOR_ADDRESS,
        }
    }
}

/// Pin and bus assignments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurtainHwConfig {
    /// ULN2003 IN1..IN4, in step-pattern order
    pub motor_pins: [PinConfig; LINE_COUNT],
    /// Open button input
    pub open_button: PinConfig,
    /// Close button input
    pub close_button: PinConfig,
    /// Ambient light sensor
    pub light_sensor: LightSensorHwConfig,
}

impl Default for CurtainHwConfig {
    fn default() -> Self {
        Self {
            motor_pins: [
                PinConfig::new(17),
                PinConfig::new(18),
                PinConfig::new(27),
                PinConfig::new(22),
            ],
            open_button: PinConfig::button(23),
            close_button: PinConfig::button(24),
            light_sensor: LightSensorHwConfig::default(),
        }
    }
}

impl CurtainHwConfig {
    /// Every GPIO in use, motor lines first
    pub fn pins(&self) -> [PinConfig; LINE_COUNT + 2] {
        let [a, b, c, d] = self.motor_pins;
        [a, b, c, d, self.open_button, self.close_button]
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CurtainConfig {
    /// Pin and bus assignments
    pub hardware: CurtainHwConfig,
    /// Stepper motion parameters
    pub motor: MotorConfig,
    /// Polling controller parameters
    pub controller: ControllerConfig,
}

impl CurtainConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the invariants the drivers rely on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.motor.cycles_per_traversal == 0 {
            return Err(ConfigError::ZeroTraversal);
        }
        if self.controller.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        let lux = self.controller.light_threshold_lux;
        if !lux.is_finite() || lux < 0.0 {
            return Err(ConfigError::InvalidThreshold(lux));
        }

        let pins = self.hardware.pins();
        for (i, a) in pins.iter().enumerate() {
            if pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(ConfigError::DuplicatePin(a.pin));
            }
        }
        Ok(())
    }
}
