//! Configuration loading
//!
//! The daemon reads one TOML file, falling back to the copy embedded in the
//! binary, then applies command-line overrides and validates the result.

pub mod loader;
pub mod toml;

pub use loader::{load, ConfigSource, Overrides};
pub use toml::DaemonConfig;
