use core::fmt::Debug;

use embassy_futures::block_on;
use embedded_hal_async::delay::DelayNs;
use hal::{EulerAngles, OrientationSensor};
use log::{info, warn};
use thiserror::Error;

use crate::imu::I2cDevice;

// BNO055 I2C addresses (depends on COM3 pin state)
pub const BNO055_I2C_ADDR_PRIMARY: u8 = 0x28;
pub const BNO055_I2C_ADDR_SECONDARY: u8 = 0x29;

// Register addresses (page 0)
pub const BNO055_REG_CHIP_ID: u8 = 0x00;
pub const BNO055_REG_PAGE_ID: u8 = 0x07;
pub const BNO055_REG_EUL_HEADING_LSB: u8 = 0x1A;
pub const BNO055_REG_OPR_MODE: u8 = 0x3D;
pub const BNO055_REG_PWR_MODE: u8 = 0x3E;
pub const BNO055_REG_SYS_TRIGGER: u8 = 0x3F;

// Chip ID for verification
pub const BNO055_CHIP_ID: u8 = 0xA0;

// SYS_TRIGGER bits
pub const BNO055_SYS_TRIGGER_RST_SYS: u8 = 0x20;
pub const BNO055_SYS_TRIGGER_CLK_SEL: u8 = 0x80;

pub const BNO055_POWER_NORMAL: u8 = 0x00;

// Euler angles are reported in 1/16 degree
pub const BNO055_EULER_LSB_PER_DEG: f32 = 16.0;

// Timings in milliseconds
const BOOT_DELAY_MS: u32 = 850;
const MODE_SWITCH_DELAY_MS: u32 = 30;
const RESET_POLL_INTERVAL_MS: u32 = 10;
const RESET_POLL_ATTEMPTS: u32 = 85;
const SETTLE_DELAY_MS: u32 = 10;

/// Operation modes of the BNO055
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OperationMode {
    /// Configuration mode, the only mode where settings can change
    Config = 0x00,
    /// Relative orientation from accelerometer and gyroscope
    Imu = 0x08,
    Compass = 0x09,
    M4g = 0x0A,
    /// Absolute orientation without fast magnetometer calibration
    NdofFmcOff = 0x0B,
    /// Absolute orientation with all nine axes fused
    Ndof = 0x0C,
}

/// Errors reported by the BNO055 driver
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bno055Error<E> {
    /// Underlying bus error
    #[error("I2C bus error")]
    I2c(E),

    /// The device answered with an unexpected chip id
    #[error("invalid chip id {0:#04x}")]
    InvalidChipId(u8),
}

/// BNO055 absolute orientation sensor
pub struct Bno055<I: I2cDevice, D: DelayNs> {
    /// I2C device for communication
    i2c: I,
    delay: D,
    /// I2C address of the device
    addr: u8,
    mode: OperationMode,
    /// Last successfully read orientation
    last: EulerAngles,
}

impl<I: I2cDevice, D: DelayNs> Bno055<I, D> {
    /// Create a new BNO055 driver on the primary I2C address (0x28)
    pub fn new(i2c: I, delay: D) -> Self {
        Self::new_with_address(i2c, delay, BNO055_I2C_ADDR_PRIMARY)
    }

    pub fn new_with_address(i2c: I, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            mode: OperationMode::Config,
            last: EulerAngles::zeros(),
        }
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    /// Give the bus and delay back
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    async fn read_register(&mut self, reg: u8) -> Result<u8, Bno055Error<I::Error>> {
        self.i2c.read_reg(self.addr, reg).await.map_err(Bno055Error::I2c)
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Bno055Error<I::Error>> {
        self.i2c.write_reg(self.addr, reg, value).await.map_err(Bno055Error::I2c)
    }

    async fn read_registers(&mut self, reg: u8, data: &mut [u8]) -> Result<(), Bno055Error<I::Error>> {
        self.i2c.read_regs(self.addr, reg, data).await.map_err(Bno055Error::I2c)
    }

    pub async fn chip_id(&mut self) -> Result<u8, Bno055Error<I::Error>> {
        self.read_register(BNO055_REG_CHIP_ID).await
    }

    /// Detect the chip, reset it and start absolute orientation fusion (NDOF)
    pub async fn init(&mut self) -> Result<(), Bno055Error<I::Error>> {
        // The chip may still be booting, give it one more chance
        let mut id = self.chip_id().await?;
        if id != BNO055_CHIP_ID {
            self.delay.delay_ms(BOOT_DELAY_MS).await;
            id = self.chip_id().await?;
            if id != BNO055_CHIP_ID {
                return Err(Bno055Error::InvalidChipId(id));
            }
        }

        self.set_mode(OperationMode::Config).await?;
        self.write_register(BNO055_REG_SYS_TRIGGER, BNO055_SYS_TRIGGER_RST_SYS).await?;
        self.wait_for_reset().await?;

        self.write_register(BNO055_REG_PWR_MODE, BNO055_POWER_NORMAL).await?;
        self.delay.delay_ms(SETTLE_DELAY_MS).await;
        self.write_register(BNO055_REG_PAGE_ID, 0).await?;
        self.write_register(BNO055_REG_SYS_TRIGGER, 0).await?;
        self.delay.delay_ms(SETTLE_DELAY_MS).await;

        self.set_mode(OperationMode::Ndof).await?;
        info!("BNO055 at {:#04x} running in {:?} mode", self.addr, self.mode);
        Ok(())
    }

    /// The chip NACKs while resetting; poll until it answers with its id
    async fn wait_for_reset(&mut self) -> Result<(), Bno055Error<I::Error>> {
        let mut last_id = 0;
        for _ in 0..RESET_POLL_ATTEMPTS {
            self.delay.delay_ms(RESET_POLL_INTERVAL_MS).await;
            if let Ok(id) = self.chip_id().await {
                if id == BNO055_CHIP_ID {
                    self.delay.delay_ms(SETTLE_DELAY_MS).await;
                    return Ok(());
                }
                last_id = id;
            }
        }
        Err(Bno055Error::InvalidChipId(last_id))
    }

    pub async fn set_mode(&mut self, mode: OperationMode) -> Result<(), Bno055Error<I::Error>> {
        self.write_register(BNO055_REG_OPR_MODE, mode as u8).await?;
        self.delay.delay_ms(MODE_SWITCH_DELAY_MS).await;
        self.mode = mode;
        Ok(())
    }

    /// Select the external 32 kHz crystal as clock source.
    ///
    /// Only writable in config mode; the previous mode is restored.
    pub async fn set_external_crystal(&mut self, use_ext_crystal: bool) -> Result<(), Bno055Error<I::Error>> {
        let previous = self.mode;
        self.set_mode(OperationMode::Config).await?;
        self.write_register(BNO055_REG_PAGE_ID, 0).await?;
        let trigger = if use_ext_crystal { BNO055_SYS_TRIGGER_CLK_SEL } else { 0 };
        self.write_register(BNO055_REG_SYS_TRIGGER, trigger).await?;
        self.delay.delay_ms(SETTLE_DELAY_MS).await;
        self.set_mode(previous).await
    }

    /// Read heading, roll and pitch in degrees
    pub async fn euler_angles(&mut self) -> Result<EulerAngles, Bno055Error<I::Error>> {
        let mut data = [0u8; 6];
        self.read_registers(BNO055_REG_EUL_HEADING_LSB, &mut data).await?;

        let heading = i16::from_le_bytes([data[0], data[1]]);
        let roll = i16::from_le_bytes([data[2], data[3]]);
        let pitch = i16::from_le_bytes([data[4], data[5]]);

        Ok(EulerAngles::new(
            f32::from(heading) / BNO055_EULER_LSB_PER_DEG,
            f32::from(roll) / BNO055_EULER_LSB_PER_DEG,
            f32::from(pitch) / BNO055_EULER_LSB_PER_DEG,
        ))
    }
}

// Blocking bridge for the synchronous sensor contract
impl<I, D> OrientationSensor for Bno055<I, D>
where
    I: I2cDevice,
    I::Error: Debug,
    D: DelayNs,
{
    fn begin(&mut self) -> bool {
        match block_on(self.init()) {
            Ok(()) => true,
            Err(err) => {
                warn!("BNO055 detection failed: {:?}", err);
                false
            }
        }
    }

    fn set_ext_crystal_use(&mut self, use_ext_crystal: bool) {
        if let Err(err) = block_on(self.set_external_crystal(use_ext_crystal)) {
            warn!("failed to select BNO055 clock source: {:?}", err);
        }
    }

    /// A failed read repeats the last good sample
    fn get_orientation(&mut self) -> EulerAngles {
        match block_on(self.euler_angles()) {
            Ok(angles) => {
                self.last = angles;
                angles
            }
            Err(err) => {
                warn!("BNO055 read failed, repeating last sample: {:?}", err);
                self.last
            }
        }
    }
}
