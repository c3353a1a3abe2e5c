//! GPIO push button
//!
//! A momentary button on one input line. Buttons wired to ground with a
//! pull-up read low when pressed, so polarity is configurable. Optional
//! debouncing accepts a new level only after it has been sampled on
//! several consecutive polls.

use curtain_core::traits::Button;
use curtain_hal::InputPin;
use log::debug;

/// Push button on a GPIO input line
pub struct GpioButton<P> {
    pin: P,
    /// Pressed reads low
    active_low: bool,
    /// Consecutive samples needed to change state (0 or 1 = no debounce)
    debounce_samples: u8,
    /// Last accepted state
    pressed: bool,
    /// Consecutive samples disagreeing with `pressed`
    counter: u8,
}

impl<P: InputPin> GpioButton<P> {
    /// Create an active-high button (pressed reads high)
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            active_low: false,
            debounce_samples: 0,
            pressed: false,
            counter: 0,
        }
    }

    /// Create an active-low button (pressed pulls the line to ground)
    pub fn active_low(pin: P) -> Self {
        Self {
            active_low: true,
            ..Self::new(pin)
        }
    }

    /// Require `samples` consecutive agreeing reads before a state change
    pub fn with_debounce(mut self, samples: u8) -> Self {
        self.debounce_samples = samples;
        self
    }

    /// Check if the button is wired active-low
    pub fn is_active_low(&self) -> bool {
        self.active_low
    }

    fn sample(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        Ok(high != self.active_low)
    }
}

impl<P: InputPin> Button for GpioButton<P> {
    type Error = P::Error;

    fn is_pressed(&mut self) -> Result<bool, P::Error> {
        let raw = self.sample()?;

        if self.debounce_samples <= 1 {
            self.pressed = raw;
            return Ok(raw);
        }

        if raw == self.pressed {
            self.counter = 0;
        } else {
            self.counter = self.counter.saturating_add(1);
            if self.counter >= self.debounce_samples {
                self.pressed = raw;
                self.counter = 0;
                debug!("Button {}", if raw { "pressed" } else { "released" });
            }
        }
        Ok(self.pressed)
    }

    fn release(&mut self) -> Result<(), P::Error> {
        self.pin.release()
    }
}
