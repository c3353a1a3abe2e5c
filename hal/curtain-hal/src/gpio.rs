//! GPIO line abstractions
//!
//! Digital input and output traits implemented by board HALs. Every
//! operation is fallible: a pin write or read that fails at the board layer
//! is a hardware fault the caller propagates.

/// Digital output line
///
/// Implementations own a pin already configured as an output.
pub trait OutputPin {
    /// Error type for line writes
    type Error;

    /// Drive the line high (logic 1)
    fn set_high(&mut self) -> Result<(), Self::Error>;

    /// Drive the line low (logic 0)
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Drive the line to a specific level
    fn set_state(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.set_high()
        } else {
            self.set_low()
        }
    }

    /// Check if the line is currently driven high
    fn is_set_high(&self) -> bool;

    /// Check if the line is currently driven low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input line
///
/// Implementations own a pin already configured as an input (with any
/// pull resistor applied at construction).
pub trait InputPin {
    /// Error type for line reads
    type Error;

    /// Check if the line reads high (logic 1)
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Check if the line reads low (logic 0)
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }

    /// Release the underlying pin back to the board
    ///
    /// Reads after release may fail. Calling it twice is harmless.
    fn release(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
