//! Smart Curtains Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the curtain drivers are written
//! against. Board crates (currently `curtain-hal-linux`) implement them, and
//! the `mock` feature provides simulated lines so the stepper and controller
//! logic can be exercised on a development host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  curtain-daemon / curtain-drivers       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  curtain-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ curtain-hal-  │       │  mock (tests) │
//! │    linux      │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`i2c::I2cBus`] - I2C bus operations
//!
//! Timing is left to `embedded_hal::delay::DelayNs`.

#![cfg_attr(not(any(test, feature = "mock")), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
