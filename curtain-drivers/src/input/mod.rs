//! Input device implementations

pub mod button;

pub use button::GpioButton;
