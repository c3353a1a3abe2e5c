//! TOML configuration format
//!
//! Tunable sections deserialize straight into the core config types. Pins
//! are written as strings (`"gpio17"`, `"!^gpio23"`) and converted with the
//! HAL's pin parser, so the file and the log output use the same notation.

use std::path::PathBuf;

use curtain_core::config::{
    ConfigError, ControllerConfig, CurtainConfig, CurtainHwConfig, LightSensorHwConfig,
    MotorConfig, PinConfig,
};
use curtain_core::motion::LINE_COUNT;
use curtain_hal_linux::pins::{format_pin, parse_pin_string};
use serde::Deserialize;
use thiserror::Error;

/// Errors while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML, or a value of the wrong type
    #[error("invalid configuration: {0}")]
    Toml(#[from] ::toml::de::Error),

    /// Pin string not in `[!][^]gpioN` form
    #[error("invalid pin for {field}: {value:?}")]
    InvalidPin { field: &'static str, value: String },

    /// Motor needs exactly one pin per ULN2003 input
    #[error("motor needs exactly 4 pins, got {0}")]
    MotorPinCount(usize),

    /// Values parsed but break an invariant
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Everything the daemon needs to wire up and run the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DaemonConfig {
    /// Controller, motor and pin configuration
    pub curtain: CurtainConfig,
    /// Consecutive agreeing polls before a button changes state
    pub debounce_samples: u8,
}

impl DaemonConfig {
    /// One-line-per-setting summary for `--check-config` and startup logs
    pub fn summary(&self) -> Vec<String> {
        let hw = &self.curtain.hardware;
        let motor = &self.curtain.motor;
        let controller = &self.curtain.controller;
        let pins: Vec<String> = hw.motor_pins.iter().map(|p| format_pin(p).to_string()).collect();
        vec![
            format!(
                "motor: {} cycles ({} sub-steps), {} us per sub-step, ~{} ms per traversal",
                motor.cycles_per_traversal,
                motor.sub_steps(),
                motor.step_delay_us,
                motor.traversal_ms()
            ),
            format!(
                "controller: open above {} lux, poll every {} ms",
                controller.light_threshold_lux, controller.poll_interval_ms
            ),
            format!("motor pins: {}", pins.join(", ")),
            format!(
                "buttons: open {}, close {}, debounce {}",
                format_pin(&hw.open_button),
                format_pin(&hw.close_button),
                self.debounce_samples
            ),
            format!(
                "light sensor: bus {}, address {:#04x}",
                hw.light_sensor.bus, hw.light_sensor.address
            ),
        ]
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    motor: MotorConfig,
    controller: ControllerConfig,
    pins: RawPins,
    buttons: RawButtons,
    light_sensor: LightSensorHwConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPins {
    motor: Option<Vec<String>>,
    open_button: Option<String>,
    close_button: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawButtons {
    debounce_samples: u8,
}

fn pin(field: &'static str, value: &str) -> Result<PinConfig, ConfigLoadError> {
    parse_pin_string(value).ok_or_else(|| ConfigLoadError::InvalidPin {
        field,
        value: value.to_string(),
    })
}

impl RawPins {
    fn resolve(&self, defaults: &CurtainHwConfig) -> Result<CurtainHwConfig, ConfigLoadError> {
        let mut hw = *defaults;

        if let Some(motor) = &self.motor {
            if motor.len() != LINE_COUNT {
                return Err(ConfigLoadError::MotorPinCount(motor.len()));
            }
            for (slot, value) in hw.motor_pins.iter_mut().zip(motor) {
                *slot = pin("pins.motor", value)?;
            }
        }
        if let Some(value) = &self.open_button {
            hw.open_button = pin("pins.open_button", value)?;
        }
        if let Some(value) = &self.close_button {
            hw.close_button = pin("pins.close_button", value)?;
        }
        Ok(hw)
    }
}

/// Parse a TOML document into a daemon configuration
///
/// Missing sections and keys keep their defaults. The result is not
/// validated; see [`CurtainConfig::validate`].
pub fn parse_config(input: &str) -> Result<DaemonConfig, ConfigLoadError> {
    let raw: RawConfig = ::toml::from_str(input)?;

    let mut hardware = raw.pins.resolve(&CurtainHwConfig::default())?;
    hardware.light_sensor = raw.light_sensor;

    Ok(DaemonConfig {
        curtain: CurtainConfig {
            hardware,
            motor: raw.motor,
            controller: raw.controller,
        },
        debounce_samples: raw.buttons.debounce_samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), DaemonConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [motor]
            step_delay_us = 2000

            [controller]
            light_threshold_lux = 250.0
            "#,
        )
        .unwrap();

        assert_eq!(config.curtain.motor.step_delay_us, 2000);
        assert_eq!(config.curtain.motor.cycles_per_traversal, 512);
        assert_eq!(config.curtain.controller.light_threshold_lux, 250.0);
        assert_eq!(config.curtain.controller.poll_interval_ms, 100);
    }

    #[test]
    fn test_pin_strings() {
        let config = parse_config(
            r#"
            [pins]
            motor = ["gpio5", "gpio6", "gpio13", "gpio19"]
            open_button = "gpio20"
            close_button = "!^gpio21"
            "#,
        )
        .unwrap();
        let hw = config.curtain.hardware;

        assert_eq!(hw.motor_pins[2], PinConfig::new(13));
        assert_eq!(hw.open_button, PinConfig::new(20));
        assert_eq!(hw.close_button, PinConfig::button(21));
    }

    #[test]
    fn test_hex_sensor_address() {
        let config = parse_config("[light_sensor]\naddress = 0x5C\n").unwrap();
        assert_eq!(config.curtain.hardware.light_sensor.address, 0x5C);
        assert_eq!(config.curtain.hardware.light_sensor.bus, 1);
    }

    #[test]
    fn test_rejects_bad_pin() {
        let err = parse_config("[pins]\nopen_button = \"pin23\"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidPin {
                field: "pins.open_button",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_wrong_motor_pin_count() {
        let err = parse_config("[pins]\nmotor = [\"gpio5\", \"gpio6\"]\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::MotorPinCount(2)));
    }

    #[test]
    fn test_rejects_unknown_key() {
        assert!(matches!(
            parse_config("[fan]\nspeed = 3\n"),
            Err(ConfigLoadError::Toml(_))
        ));
    }

    #[test]
    fn test_summary_mentions_pins() {
        let summary = DaemonConfig::default().summary().join("\n");
        assert!(summary.contains("gpio17, gpio18, gpio27, gpio22"));
        assert!(summary.contains("open !^gpio23"));
        assert!(summary.contains("address 0x23"));
    }
}
