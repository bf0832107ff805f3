use core::fmt;

/// Errors produced by the MPU6050 driver, `E` is the error type of the underlying i2c bus.
/// 
#[derive(Debug)]
pub enum Mpu6050Error<E> {
    I2c(E),

    /// No DMP image was handed to the driver, so there is nothing to upload.
    EmptyDmpImage,

    /// Reading back DMP memory after an upload did not match what was written.
    DmpVerifyFailed { bank: u8, address: u8 },

    /// Requested FIFO packet size does not fit the driver's read buffer or holds no quaternion.
    BadPacketSize(u16),
}

impl<E: fmt::Debug> fmt::Display for Mpu6050Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "i2c error: {:?}", e),
            Self::EmptyDmpImage => write!(f, "no DMP image configured"),
            Self::DmpVerifyFailed { bank, address } => 
                write!(f, "DMP memory verify failed at bank {} address {}", bank, address),
            Self::BadPacketSize(size) => write!(f, "unsupported FIFO packet size {}", size),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for Mpu6050Error<E> {}
