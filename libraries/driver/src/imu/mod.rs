// Orientation sensor drivers over an async I2C bus.
//
// Drivers talk to the bus through `I2cDevice`, which every
// `embedded_hal_async::i2c::I2c` implementation gets for free, and expose
// the blocking `hal::OrientationSensor` contract on top.

use embedded_hal_async::i2c::{ErrorType, I2c};

pub mod bno055;

pub use self::bno055::{Bno055, Bno055Error, OperationMode};

/// Common interface for I2C device operations with async support
pub trait I2cDevice {
    type Error;

    /// Write data to a device at the specified address
    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Write data to a device and then read from it (combined operation)
    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Read a single register from a device
    async fn read_reg(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let mut buffer = [0u8; 1];
        self.write_read(addr, &[reg], &mut buffer).await?;
        Ok(buffer[0])
    }

    /// Write to a single register on a device
    async fn write_reg(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.write(addr, &[reg, value]).await
    }

    /// Read multiple registers from a device
    async fn read_regs(&mut self, addr: u8, reg: u8, data: &mut [u8]) -> Result<(), Self::Error> {
        self.write_read(addr, &[reg], data).await
    }
}

impl<T: I2c> I2cDevice for T {
    type Error = <T as ErrorType>::Error;

    async fn write(&mut self, addr: u8, data: &[u8]) -> Result<(), <T as ErrorType>::Error> {
        <T as I2c>::write(self, addr, data).await
    }

    async fn write_read(
        &mut self,
        addr: u8,
        write_data: &[u8],
        read_data: &mut [u8],
    ) -> Result<(), <T as ErrorType>::Error> {
        <T as I2c>::write_read(self, addr, write_data, read_data).await
    }
}
