//! Configuration file lookup, overrides and validation

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::toml::{parse_config, ConfigLoadError, DaemonConfig};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_PATH: &str = "curtain.toml";

/// Configuration compiled into the binary
pub const EMBEDDED_CONFIG: &str = include_str!("../../curtain.toml");

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from this file
    File(PathBuf),
    /// No file found, embedded defaults used
    Embedded,
}

/// Command-line values that replace the file's
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overrides {
    pub light_threshold_lux: Option<f32>,
    pub cycles_per_traversal: Option<u32>,
    pub step_delay_us: Option<u32>,
    pub poll_interval_ms: Option<u32>,
}

impl Overrides {
    /// Apply every value that was given
    pub fn apply(&self, config: &mut DaemonConfig) {
        let curtain = &mut config.curtain;
        if let Some(lux) = self.light_threshold_lux {
            curtain.controller.light_threshold_lux = lux;
        }
        if let Some(cycles) = self.cycles_per_traversal {
            curtain.motor.cycles_per_traversal = cycles;
        }
        if let Some(us) = self.step_delay_us {
            curtain.motor.step_delay_us = us;
        }
        if let Some(ms) = self.poll_interval_ms {
            curtain.controller.poll_interval_ms = ms;
        }
    }
}

/// Load, override and validate the configuration
///
/// An explicit `path` must exist. Without one, `curtain.toml` in the
/// working directory is used if present, otherwise the embedded copy.
pub fn load(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<(DaemonConfig, ConfigSource), ConfigLoadError> {
    let (text, source) = match path {
        Some(path) => (read(path)?, ConfigSource::File(path.to_path_buf())),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.is_file() {
                (read(default)?, ConfigSource::File(default.to_path_buf()))
            } else {
                warn!(
                    "No {} in the working directory, using built-in defaults",
                    DEFAULT_CONFIG_PATH
                );
                (EMBEDDED_CONFIG.to_string(), ConfigSource::Embedded)
            }
        }
    };

    let mut config = parse_config(&text)?;
    overrides.apply(&mut config);
    config.curtain.validate()?;

    if let ConfigSource::File(path) = &source {
        info!("Loaded configuration from {}", path.display());
    }
    Ok((config, source))
}

fn read(path: &Path) -> Result<String, ConfigLoadError> {
    fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtain_core::config::ConfigError;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_embedded_config_matches_defaults() {
        let config = parse_config(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config, DaemonConfig::default());
        assert_eq!(config.curtain.validate(), Ok(()));
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config("[controller]\nlight_threshold_lux = 150.0\n");
        let (config, source) = load(Some(file.path()), &Overrides::default()).unwrap();

        assert_eq!(config.curtain.controller.light_threshold_lux, 150.0);
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = load(Some(&missing), &Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let file = write_config("[motor]\ncycles_per_traversal = 100\nstep_delay_us = 500\n");
        let overrides = Overrides {
            light_threshold_lux: Some(800.0),
            cycles_per_traversal: Some(64),
            step_delay_us: None,
            poll_interval_ms: Some(250),
        };

        let (config, _) = load(Some(file.path()), &overrides).unwrap();
        let curtain = config.curtain;
        assert_eq!(curtain.controller.light_threshold_lux, 800.0);
        assert_eq!(curtain.motor.cycles_per_traversal, 64);
        assert_eq!(curtain.motor.step_delay_us, 500);
        assert_eq!(curtain.controller.poll_interval_ms, 250);
    }

    #[test]
    fn test_override_is_validated() {
        let file = write_config("");
        let overrides = Overrides {
            cycles_per_traversal: Some(0),
            ..Overrides::default()
        };

        let err = load(Some(file.path()), &overrides).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid(ConfigError::ZeroTraversal)
        ));
    }

    #[test]
    fn test_duplicate_pins_rejected() {
        let file = write_config("[pins]\nopen_button = \"gpio17\"\n");
        let err = load(Some(file.path()), &Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid(ConfigError::DuplicatePin(17))
        ));
    }
}
