//! Smart Curtains daemon
//!
//! Opens the curtain when the morning light crosses the threshold or the
//! open button is pressed, and closes it on the close button. Runs until
//! SIGINT or SIGTERM, then releases every line before exiting.

mod cli;
mod config;
mod hardware;

use anyhow::{Context, Result};
use clap::Parser;
use curtain_core::controller::RunControl;
use curtain_hal_linux::Delay;
use log::{info, LevelFilter};

use crate::cli::Cli;
use crate::config::{ConfigSource, Overrides};

/// Shared with the signal handler and the motor's abort check
static RUN_CONTROL: RunControl = RunControl::new();

fn init_logging(level: Option<LevelFilter>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let overrides = Overrides {
        light_threshold_lux: cli.threshold,
        cycles_per_traversal: cli.cycles,
        step_delay_us: cli.step_delay_us,
        poll_interval_ms: cli.poll_ms,
    };
    let (config, source) =
        config::load(cli.config.as_deref(), &overrides).context("configuration rejected")?;

    if cli.check_config {
        match &source {
            ConfigSource::File(path) => println!("{}: OK", path.display()),
            ConfigSource::Embedded => println!("built-in configuration: OK"),
        }
        for line in config.summary() {
            println!("  {}", line);
        }
        return Ok(());
    }
    for line in config.summary() {
        info!("{}", line);
    }

    ctrlc::set_handler(|| RUN_CONTROL.request_stop())
        .context("failed to install the signal handler")?;

    let mut controller = hardware::build(&config, &RUN_CONTROL)?;
    let mut delay = Delay::new();
    controller
        .run(&mut delay, &RUN_CONTROL)
        .context("controller stopped on a hardware fault")?;

    info!("Shutdown complete");
    Ok(())
}
