//! BH1750 ambient light sensor
//!
//! 16-bit digital lux meter on I2C. The driver powers the chip up and puts
//! it in a continuous measurement mode on first use, then every read just
//! fetches the latest two-byte result. In continuous mode the chip keeps
//! converting, so a poll period at or above the conversion time (120 ms in
//! high resolution) always sees a fresh value.

use core::fmt;

use curtain_core::traits::LightSensor;
use curtain_hal::I2cBus;
use log::{debug, info};

/// Address with the ADDR pin low (the usual breakout default)
pub const ADDRESS_LOW: u8 = 0x23;

/// Address with the ADDR pin high
pub const ADDRESS_HIGH: u8 = 0x5C;

/// BH1750 opcodes
#[allow(dead_code)]
mod cmd {
    pub const POWER_DOWN: u8 = 0x00;
    pub const POWER_ON: u8 = 0x01;
    pub const RESET: u8 = 0x07;
    pub const CONTINUOUS_HIGH_RES: u8 = 0x10;
    pub const CONTINUOUS_HIGH_RES_2: u8 = 0x11;
    pub const CONTINUOUS_LOW_RES: u8 = 0x13;
}

/// Measurement resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 1 lx steps, 120 ms conversion
    #[default]
    High,
    /// 0.5 lx steps, 120 ms conversion
    High2,
    /// 4 lx steps, 16 ms conversion
    Low,
}

impl Resolution {
    fn opcode(self) -> u8 {
        match self {
            Resolution::High => cmd::CONTINUOUS_HIGH_RES,
            Resolution::High2 => cmd::CONTINUOUS_HIGH_RES_2,
            Resolution::Low => cmd::CONTINUOUS_LOW_RES,
        }
    }

    /// Convert a raw count to lux
    ///
    /// lux = count / 1.2 (count / 2.4 in mode 2), as an exact ratio.
    pub fn to_lux(self, raw: u16) -> f32 {
        let scaled = raw as f32 * 5.0;
        match self {
            Resolution::High2 => scaled / 12.0,
            Resolution::High | Resolution::Low => scaled / 6.0,
        }
    }
}

/// BH1750 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bh1750Error<E> {
    /// Bus transfer failed
    Bus(E),
    /// The chip only answers on 0x23 or 0x5C
    UnsupportedAddress(u8),
}

impl<E: fmt::Display> fmt::Display for Bh1750Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bh1750Error::Bus(e) => write!(f, "BH1750 bus error: {}", e),
            Bh1750Error::UnsupportedAddress(addr) => {
                write!(f, "BH1750 does not use address {:#04x}", addr)
            }
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for Bh1750Error<E> {}

/// BH1750 light sensor on an I2C bus
pub struct Bh1750<I2C> {
    i2c: I2C,
    address: u8,
    resolution: Resolution,
    initialized: bool,
}

impl<I2C: I2cBus> Bh1750<I2C> {
    /// Create a driver for the sensor at `address`
    ///
    /// Nothing is sent on the bus until the first read or [`init`](Self::init).
    pub fn new(i2c: I2C, address: u8) -> Result<Self, Bh1750Error<I2C::Error>> {
        if address != ADDRESS_LOW && address != ADDRESS_HIGH {
            return Err(Bh1750Error::UnsupportedAddress(address));
        }
        Ok(Self {
            i2c,
            address,
            resolution: Resolution::default(),
            initialized: false,
        })
    }

    /// Use a different measurement resolution
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self.initialized = false;
        self
    }

    /// Get the bus address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Get the measurement resolution
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Power on, reset the data register and start continuous measurement
    pub fn init(&mut self) -> Result<(), Bh1750Error<I2C::Error>> {
        self.command(cmd::POWER_ON)?;
        self.command(cmd::RESET)?;
        self.command(self.resolution.opcode())?;
        self.initialized = true;
        info!(
            "BH1750 at {:#04x} measuring in {:?} resolution",
            self.address, self.resolution
        );
        Ok(())
    }

    /// Read the latest raw count, initializing the chip if needed
    pub fn read_raw(&mut self) -> Result<u16, Bh1750Error<I2C::Error>> {
        if !self.initialized {
            self.init()?;
        }
        let mut buf = [0u8; 2];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(Bh1750Error::Bus)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Put the chip into power-down; the next read re-initializes it
    pub fn power_down(&mut self) -> Result<(), Bh1750Error<I2C::Error>> {
        self.command(cmd::POWER_DOWN)?;
        self.initialized = false;
        debug!("BH1750 powered down");
        Ok(())
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, opcode: u8) -> Result<(), Bh1750Error<I2C::Error>> {
        self.i2c
            .write(self.address, &[opcode])
            .map_err(Bh1750Error::Bus)
    }
}

impl<I2C: I2cBus> LightSensor for Bh1750<I2C> {
    type Error = Bh1750Error<I2C::Error>;

    fn read_lux(&mut self) -> Result<f32, Self::Error> {
        let raw = self.read_raw()?;
        Ok(self.resolution.to_lux(raw))
    }
}
