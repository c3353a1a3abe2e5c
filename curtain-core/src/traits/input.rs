//! Button and light sensor traits

/// Momentary push button
pub trait Button {
    /// Error type for reading the button
    type Error;

    /// Check if the button is currently pressed
    ///
    /// Non-blocking. Whether the reading is debounced is up to the driver.
    fn is_pressed(&mut self) -> Result<bool, Self::Error>;

    /// Release the button's pin
    fn release(&mut self) -> Result<(), Self::Error>;
}

/// Ambient light sensor
pub trait LightSensor {
    /// Error type for sensor reads
    type Error;

    /// Read the current illuminance in lux
    ///
    /// Takes `&mut self` because bus reads require mutable access.
    fn read_lux(&mut self) -> Result<f32, Self::Error>;
}
