//! GPIO allocation and config-string parsing
//!
//! Tracks which header pins are in use to prevent conflicts.

use curtain_core::config::PinConfig;
use heapless::FnvIndexSet;

/// Number of user GPIO lines on the 40-pin header (BCM 0-27)
pub const GPIO_COUNT: usize = 28;

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    /// Set of allocated GPIO pins
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    /// Create a new GPIO allocator
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Allocate a GPIO pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), AllocError> {
        if pin as usize >= GPIO_COUNT {
            return Err(AllocError::InvalidPin(pin));
        }
        if self.allocated.contains(&pin) {
            return Err(AllocError::InUse(pin));
        }
        self.allocated
            .insert(pin)
            .map_err(|_| AllocError::InvalidPin(pin))?;
        Ok(())
    }

    /// Release a GPIO pin
    pub fn release(&mut self, pin: u8) {
        self.allocated.remove(&pin);
    }

    /// Check if a pin is allocated
    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    /// Get the number of allocated pins
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// Allocation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Pin number out of range
    InvalidPin(u8),
    /// Pin already allocated
    InUse(u8),
}

/// Parse a pin string from config
///
/// Supports formats:
/// - "gpio17" -> pin 17
/// - "!gpio23" -> inverted (active-low)
/// - "^gpio23" -> internal pull-up enabled
/// - "!^gpio23" / "^!gpio23" -> both
pub fn parse_pin_string(s: &str) -> Option<PinConfig> {
    let mut rest = s.trim();
    let mut config = PinConfig::default();

    loop {
        if let Some(tail) = rest.strip_prefix('!') {
            if config.inverted {
                return None;
            }
            config.inverted = true;
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix('^') {
            if config.pull_up {
                return None;
            }
            config.pull_up = true;
            rest = tail;
        } else {
            break;
        }
    }

    let num_str = rest.strip_prefix("gpio")?;
    if num_str.is_empty() || !num_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let pin: u8 = num_str.parse().ok()?;

    if pin as usize >= GPIO_COUNT {
        return None;
    }

    config.pin = pin;
    Some(config)
}

/// Format a pin config back into its config-string form
pub fn format_pin(config: &PinConfig) -> heapless::String<12> {
    let mut out = heapless::String::new();
    if config.inverted {
        let _ = out.push('!');
    }
    if config.pull_up {
        let _ = out.push('^');
    }
    let _ = core::fmt::Write::write_fmt(&mut out, format_args!("gpio{}", config.pin));
    out
}
