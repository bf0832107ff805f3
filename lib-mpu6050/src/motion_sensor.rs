use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use math::Quaternion;
use tracker::MotionSensor;

use crate::registers::{INT_DATA_RDY, INT_DMP};
use crate::{Mpu6050, Mpu6050Error};

/// Raw gyro readings averaged per bias calibration.
const CALIBRATION_SAMPLES: u16 = 200;

impl<I: I2c, D: DelayNs> MotionSensor for Mpu6050<I, D> {
    type Error = Mpu6050Error<I::Error>;

    fn probe(&mut self) -> Result<bool, Self::Error> {
        self.connection_okay()
    }

    fn initialize(&mut self) -> Result<u16, Self::Error> {
        self.initialize_dmp()
    }

    fn interrupt_pending(&mut self) -> Result<bool, Self::Error> {
        Ok(self.get_int_status()? & (INT_DATA_RDY | INT_DMP) != 0)
    }

    fn fifo_len(&mut self) -> Result<u16, Self::Error> {
        self.get_fifo_count()
    }

    fn pop_sample(&mut self, packet_size: u16) -> Result<Quaternion, Self::Error> {
        Ok(self.pop_dmp_packet(packet_size)?.orientation())
    }

    fn calibrate(&mut self) -> Result<(), Self::Error> {
        self.calibrate_gyro(CALIBRATION_SAMPLES)
    }
}
