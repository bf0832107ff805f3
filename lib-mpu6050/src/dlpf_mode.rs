/// DLPF (Digital Low Pass Filter) mode, this determines the highest frequency that is not filtered
/// out. The DMP image expects 42 Hz.
/// 
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DLPFMode {
    Bw256Hz = 0x00,
    Bw188Hz = 0x01,
    Bw98Hz = 0x02,
    Bw42Hz = 0x03,
    Bw20Hz = 0x04,
    Bw10Hz = 0x05,
    Bw5Hz = 0x06,
}

impl DLPFMode {
    /// Gyroscope output rate, the sample rate divider divides this one. Only the unfiltered mode
    /// runs the gyro at 8 kHz.
    /// 
    pub const fn gyro_output_rate_hz(&self) -> u16 {
        match self {
            Self::Bw256Hz => 8000,
            _ => 1000,
        }
    }

    /// Sample rate that results from `divider`, see [`crate::Mpu6050::set_sample_rate_divider`].
    /// 
    pub const fn sample_rate_hz(&self, divider: u8) -> u16 {
        self.gyro_output_rate_hz() / (1 + divider as u16)
    }
}
