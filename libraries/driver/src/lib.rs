#![no_std]

pub mod imu;

pub use imu::{Bno055, Bno055Error, I2cDevice, OperationMode};
