#![no_std]
extern crate nalgebra;

mod imu;
mod serial;
mod types;

pub use imu::*;
pub use serial::*;
pub use types::*;
