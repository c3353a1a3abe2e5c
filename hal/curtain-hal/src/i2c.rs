//! I2C bus master trait
//!
//! Devices are addressed per transfer with their 7-bit address, so one bus
//! handle can serve several sensors.

/// I2C bus master
pub trait I2cBus {
    /// Bus-level error (NACK, arbitration loss, device gone)
    type Error;

    /// Send `data` to the device at `address`
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Fill `buf` from the device at `address`
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Send `write_data`, then fill `read_buf`, as one repeated-start transfer
    ///
    /// The default issues two separate transfers, which is enough for
    /// devices without an addressed register file. Backends that support a
    /// combined transfer should override it.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.write(address, write_data)?;
        self.read(address, read_buf)
    }
}
