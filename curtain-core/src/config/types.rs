//! Tunable parameter definitions
//!
//! Step count and inter-step delay trade curtain travel against torque and
//! noise; the light threshold and polling interval set how the controller
//! reacts. None of them are compiled-in constants so a different track
//! length or sensor placement only needs a config change.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::PHASE_COUNT;

/// Full four-phase cycles per traversal
pub const DEFAULT_CYCLES_PER_TRAVERSAL: u32 = 512;

/// Delay after each sub-step (10 ms)
pub const DEFAULT_STEP_DELAY_US: u32 = 10_000;

/// Lux level above which the curtain opens (roughly sunrise)
pub const DEFAULT_LIGHT_THRESHOLD_LUX: f32 = 400.0;

/// Controller polling interval
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;

/// Stepper motion parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotorConfig {
    /// Full cycles through the step pattern per open or close
    pub cycles_per_traversal: u32,
    /// Delay after every sub-step, in microseconds
    pub step_delay_us: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            cycles_per_traversal: DEFAULT_CYCLES_PER_TRAVERSAL,
            step_delay_us: DEFAULT_STEP_DELAY_US,
        }
    }
}

impl MotorConfig {
    /// Total sub-steps (line-write groups) in one traversal
    pub fn sub_steps(&self) -> u32 {
        self.cycles_per_traversal.saturating_mul(PHASE_COUNT as u32)
    }

    /// Nominal duration of one traversal in milliseconds
    pub fn traversal_ms(&self) -> u64 {
        self.sub_steps() as u64 * self.step_delay_us as u64 / 1000
    }
}

/// Polling controller parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// Readings strictly above this open the curtain
    pub light_threshold_lux: f32,
    /// Wait between polling cycles, in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            light_threshold_lux: DEFAULT_LIGHT_THRESHOLD_LUX,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl ControllerConfig {
    /// Whether a reading should open the curtain
    ///
    /// Strict comparison: a reading equal to the threshold does not trigger.
    /// NaN never triggers.
    pub fn exceeds_threshold(&self, lux: f32) -> bool {
        lux > self.light_threshold_lux
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A traversal must emit at least one cycle
    ZeroTraversal,
    /// The polling loop needs a non-zero interval
    ZeroPollInterval,
    /// Threshold is negative, NaN or infinite
    InvalidThreshold(f32),
    /// The same GPIO is assigned twice
    DuplicatePin(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroTraversal => f.write_str("cycles_per_traversal must be at least 1"),
            ConfigError::ZeroPollInterval => f.write_str("poll_interval_ms must be at least 1"),
            ConfigError::InvalidThreshold(lux) => {
                write!(f, "light threshold {} is not a finite, non-negative lux value", lux)
            }
            ConfigError::DuplicatePin(pin) => write!(f, "gpio{} is assigned more than once", pin),
        }
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_defaults() {
        let config = MotorConfig::default();
        assert_eq!(config.cycles_per_traversal, 512);
        assert_eq!(config.step_delay_us, 10_000);
        assert_eq!(config.sub_steps(), 2048);
        assert_eq!(config.traversal_ms(), 20_480);
    }

    #[test]
    fn test_sub_steps_saturate() {
        let config = MotorConfig {
            cycles_per_traversal: u32::MAX,
            step_delay_us: 0,
        };
        assert_eq!(config.sub_steps(), u32::MAX);
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = ControllerConfig::default();
        assert!(!config.exceeds_threshold(399.0));
        assert!(!config.exceeds_threshold(400.0));
        assert!(config.exceeds_threshold(401.0));
        assert!(!config.exceeds_threshold(f32::NAN));
    }
}
