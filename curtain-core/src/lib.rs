//! Board-agnostic core logic for the smart curtain controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration types (tunables and pin assignments)
//! - The four-phase step pattern and motor/curtain state
//! - Collaborator traits (curtain motor, button, light sensor, stop request)
//! - The polling controller and its run/stop control

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod motion;
pub mod traits;
