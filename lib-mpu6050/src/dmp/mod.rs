pub mod packet;
pub use packet::*;

/// Size of a single DMP memory bank in bytes.
/// 
pub const DMP_MEMORY_BANK_SIZE: u16 = 256;

/// Largest burst that is written to (or read back from) DMP memory in one i2c transaction.
/// 
pub const DMP_MEMORY_CHUNK_SIZE: usize = 16;

/// Bank and address of the FIFO rate divisor inside the MotionApps 2.0 image.
/// 
pub const DMP_FIFO_RATE_BANK: u8 = 0x02;
pub const DMP_FIFO_RATE_ADDRESS: u8 = 0x16;

/// FIFO rate divisor patched into the image, the DMP emits at `200 Hz / (1 + divisor)`.
/// 
pub const DMP_FIFO_RATE_DIVISOR: u8 = 0x01;
