#![cfg_attr(not(test), no_std)]

//! Driver for the InvenSense MPU6050 with just enough DMP support to stream fused orientation
//! quaternions out of the FIFO. Generic over any `embedded-hal` 1.0 i2c bus and delay source.

pub mod gyro_scale_range;
pub use gyro_scale_range::*;

pub mod i2c_slave;
pub use i2c_slave::*;

pub mod clock_source;
pub use clock_source::*;

pub mod dlpf_mode;
pub use dlpf_mode::*;

pub mod error;
pub use error::*;

pub mod registers;

pub mod dmp;

pub mod mpu6050;
pub use mpu6050::*;

mod motion_sensor;

#[cfg(test)]
mod tests;

/// Default i2c address of the MPU 6050 chip (AD0 pulled low).
/// 
pub const MPU6050_DEFAULT_I2C_ADDR: u8 = 0x68;

/// Value of the `WHO_AM_I` register on a genuine MPU6050.
/// 
pub const MPU6050_WHO_AM_I: u8 = 0x68;
