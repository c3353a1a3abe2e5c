//! Configuration types
//!
//! Tunables and pin assignments. Everything here is set at startup and
//! stays fixed for the life of the process.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
