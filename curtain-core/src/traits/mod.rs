//! Hardware abstraction traits
//!
//! These traits define the interface between the controller logic and
//! the concrete motor, input and sensor drivers.

pub mod input;
pub mod motor;
pub mod stop;

pub use input::{Button, LightSensor};
pub use motor::CurtainDriver;
pub use stop::{NeverStop, StopRequest};
