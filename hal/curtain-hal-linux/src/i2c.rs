//! I2C bus master on `/dev/i2c-N`

use curtain_hal::I2cBus;
use log::debug;
use rppal::i2c::I2c;

use crate::error::LinuxHalError;

/// I2C bus master
///
/// The kernel driver addresses one slave at a time, so the address is only
/// reprogrammed when a transfer targets a different device.
pub struct LinuxI2c {
    bus: I2c,
    address: Option<u8>,
}

impl LinuxI2c {
    /// Open bus `bus` (`/dev/i2c-<bus>`)
    pub fn new(bus: u8) -> Result<Self, LinuxHalError> {
        let bus = I2c::with_bus(bus)?;
        debug!("Opened I2C bus {}", bus.bus());
        Ok(Self { bus, address: None })
    }

    fn select(&mut self, address: u8) -> Result<(), LinuxHalError> {
        if self.address != Some(address) {
            self.bus.set_slave_address(u16::from(address))?;
            self.address = Some(address);
        }
        Ok(())
    }
}

fn check_len(done: usize, expected: usize) -> Result<(), LinuxHalError> {
    if done == expected {
        Ok(())
    } else {
        Err(LinuxHalError::ShortTransfer { done, expected })
    }
}

impl I2cBus for LinuxI2c {
    type Error = LinuxHalError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), LinuxHalError> {
        self.select(address)?;
        let done = self.bus.write(data)?;
        check_len(done, data.len())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), LinuxHalError> {
        self.select(address)?;
        let done = self.bus.read(buf)?;
        check_len(done, buf.len())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), LinuxHalError> {
        self.select(address)?;
        self.bus.write_read(write_data, read_buf)?;
        Ok(())
    }
}
