//! Command-line interface

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Open the curtain at sunrise or on a button press, close it on a button press
#[derive(Debug, Parser)]
#[command(name = "smart-curtains", version)]
pub struct Cli {
    /// Configuration file [default: ./curtain.toml, else built-in defaults]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Light level (lux) above which the curtain opens
    #[arg(long, value_name = "LUX")]
    pub threshold: Option<f32>,

    /// Full step-pattern cycles per open or close
    #[arg(long, value_name = "N")]
    pub cycles: Option<u32>,

    /// Delay after every sub-step, in microseconds
    #[arg(long, value_name = "US")]
    pub step_delay_us: Option<u32>,

    /// Polling interval, in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u32>,

    /// Log level (overrides RUST_LOG)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<LevelFilter>,

    /// Load and validate the configuration, print it, and exit
    #[arg(long)]
    pub check_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["smart-curtains"]);
        assert!(cli.config.is_none());
        assert!(cli.threshold.is_none());
        assert!(cli.log_level.is_none());
        assert!(!cli.check_config);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "smart-curtains",
            "--config",
            "/etc/curtain.toml",
            "--threshold",
            "250.5",
            "--cycles",
            "256",
            "--step-delay-us",
            "2000",
            "--poll-ms",
            "50",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/curtain.toml")));
        assert_eq!(cli.threshold, Some(250.5));
        assert_eq!(cli.cycles, Some(256));
        assert_eq!(cli.step_delay_us, Some(2000));
        assert_eq!(cli.poll_ms, Some(50));
        assert_eq!(cli.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Cli::try_parse_from(["smart-curtains", "--cycles", "-3"]).is_err());
    }
}
