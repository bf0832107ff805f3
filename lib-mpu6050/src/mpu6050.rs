use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::dmp::*;
use crate::registers::*;
use crate::*;

/// Largest FIFO packet the driver is willing to pop in one go.
///
const MAX_PACKET_SIZE: usize = 64;

/// 1 kHz / (1 + 4) = 200 Hz, the rate the DMP image is built for.
///
const DMP_SAMPLE_RATE_DIVIDER: u8 = 4;

pub struct Mpu6050<I, D>
{
    /// i2c bus that we actually use to communicate with the MPU6050 chip.
    i2c: I,

    /// Delay source for the settle times in the setup sequence.
    delay: D,

    /// i2c address that chip is located at.
    address: u8,

    /// MotionApps 2.0 DMP image uploaded by `initialize_dmp`.
    dmp_image: &'static [u8],
}

impl<I: I2c, D: DelayNs> Mpu6050<I, D>
{
    /// Create a new MPU 6050 instance on the given bus, `dmp_image` is the firmware blob that
    /// gets loaded into the DMP during initialization.
    ///
    pub fn new(i2c: I, delay: D, dmp_image: &'static [u8]) -> Self {
        Mpu6050 {
            i2c,
            delay,
            address: MPU6050_DEFAULT_I2C_ADDR,
            dmp_image,
        }
    }

    /// Use a non default i2c address (0x69 when AD0 is pulled high).
    ///
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Gives back the bus and delay source.
    ///
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    /// Raw contents of the `WHO_AM_I` register.
    ///
    pub fn who_am_i(&mut self) -> Result<u8, Mpu6050Error<I::Error>> {
        self.get_register_value(WHO_AM_I)
    }

    /// Checks if the i2c connection with the MPU6050 chip is working as expected, practically
    /// speaking this function just checks if the identity register holds the expected value.
    /// A bus error is returned as an error, a wrong value as `Ok(false)`.
    ///
    pub fn connection_okay(&mut self) -> Result<bool, Mpu6050Error<I::Error>> {
        Ok(self.who_am_i()? == MPU6050_WHO_AM_I)
    }

    /// Resets all registers of the chip to their power on values, the chip comes back asleep.
    ///
    pub fn reset_device(&mut self) -> Result<(), Mpu6050Error<I::Error>> {
        self.set_register_value(PWR_MGMT_1, PWR_MGMT_1_DEVICE_RESET)?;
        self.delay.delay_ms(30);
        Ok(())
    }

    pub fn set_sleep_enabled(&mut self, enabled: bool) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(PWR_MGMT_1, PWR_MGMT_1_SLEEP, if enabled { PWR_MGMT_1_SLEEP } else { 0 })
    }

    pub fn set_gyro_scale(&mut self, scale: GyroScaleRange) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(GYRO_CONFIG, 0b0001_1000, scale.as_register())
    }

    pub fn get_gyro_scale(&mut self) -> Result<GyroScaleRange, Mpu6050Error<I::Error>> {
        Ok(GyroScaleRange::from_register(self.get_register_value(GYRO_CONFIG)?))
    }

    /// Set digital low-pass filter configuration
    ///
    pub fn set_dlpf_mode(&mut self, mode: DLPFMode) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(CONFIG, 0b0000_0111, mode as u8)
    }

    /// Sets the sample rate based on the divider using the following formula:
    /// `1khz / (1 + divider) = sample_rate`
    ///
    /// For example: `1khz / (1 + 4) = 200 Hz`
    ///
    pub fn set_sample_rate_divider(&mut self, divider: u8) -> Result<(), Mpu6050Error<I::Error>> {
        self.set_register_value(SMPLRT_DIV, divider)
    }

    pub fn set_external_frame_sync(&mut self, sync: u8) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(CONFIG, 0b0011_1000, (sync & 0b111) << 3)
    }

    pub fn set_clock_source(&mut self, source: ClockSource) -> Result<(), Mpu6050Error<I::Error>> {
        log::debug!("Setting clock source={:?}", source);
        self.update_register(PWR_MGMT_1, 0b0000_0111, source as u8)
    }

    /// Sets the i2c address at which the MPU6050 should expect to find the given slave.
    ///
    pub fn set_slave_address(&mut self, slave: I2cSlave, address: u8) -> Result<(), Mpu6050Error<I::Error>> {
        self.set_register_value(slave.address_register(), address)
    }

    pub fn set_i2c_master_mode(&mut self, enable: bool) -> Result<(), Mpu6050Error<I::Error>> {
        let bits = if enable { USER_CTRL_I2C_MST_EN } else { 0 };
        self.update_register(USER_CTRL, USER_CTRL_I2C_MST_EN, bits)
    }

    pub fn reset_i2c_master(&mut self) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(USER_CTRL, USER_CTRL_I2C_MST_RESET, USER_CTRL_I2C_MST_RESET)
    }

    /// Get the MPU hardware revision, practically this reads a magical undocumented byte in the
    /// MPU's memory whose location was found in the `i2cdevlib` C++ library. It is only logged.
    ///
    pub fn get_hardware_revision(&mut self) -> Result<u8, Mpu6050Error<I::Error>> {
        self.set_memory_bank(0x10, true, true)?;
        self.set_memory_start_address(0x06)?;
        let revision = self.get_register_value(DMP_MEM_R_W)?;
        self.set_memory_bank(0, false, false)?;
        Ok(revision)
    }

    /// Initializes the DMP (Digital Motion Processor) so data can be read from the FIFO queue,
    /// this needs to be called each time the sensor (re)appears on the bus. On success the DMP
    /// is running and the size of one FIFO packet is returned.
    ///
    /// Because the DMP part of the chip is mostly undocumented this sequence follows
    /// `MPU6050_6Axis_MotionApps20::dmpInitialize()` from Jeff Rowberg's `i2cdevlib`.
    ///
    pub fn initialize_dmp(&mut self) -> Result<u16, Mpu6050Error<I::Error>> {
        let image = self.dmp_image;
        if image.is_empty() {
            return Err(Mpu6050Error::EmptyDmpImage);
        }

        self.reset_device()?;
        self.set_sleep_enabled(false)?;

        let revision = self.get_hardware_revision()?;
        log::debug!("Hardware revision: {}", revision);
        let otp_bank_valid = self.get_otp_bank_valid()?;
        log::debug!("OTP bank valid: {}", otp_bank_valid);

        // Slave 0 juggling copied from the reference sequence, nothing sits on the aux bus.
        self.set_slave_address(I2cSlave::Slave0, 0x7F)?;
        self.set_i2c_master_mode(false)?;
        self.set_slave_address(I2cSlave::Slave0, 0x68)?;
        self.reset_i2c_master()?;
        self.delay.delay_ms(20);

        self.set_clock_source(ClockSource::GyroZ)?;

        log::debug!("Enabling DMP and FIFO_OFLOW interrupts");
        self.set_register_value(INT_ENABLE, INT_DMP | INT_FIFO_OFLOW)?;

        self.set_sample_rate_divider(DMP_SAMPLE_RATE_DIVIDER)?;
        self.set_external_frame_sync(1)?;
        self.set_dlpf_mode(DLPFMode::Bw42Hz)?;
        log::debug!("Sample rate: {} Hz", DLPFMode::Bw42Hz.sample_rate_hz(DMP_SAMPLE_RATE_DIVIDER));
        self.set_gyro_scale(GyroScaleRange::D2000)?;

        self.write_memory_block(image, 0, 0)?;
        self.write_memory_block(&[0x00, DMP_FIFO_RATE_DIVISOR], DMP_FIFO_RATE_BANK, DMP_FIFO_RATE_ADDRESS)?;

        self.set_register_value(DMP_CFG_1, 0x03)?;
        self.set_register_value(DMP_CFG_2, 0x00)?;

        self.set_otp_bank_valid(false)?;

        self.set_register_value(MOT_THR, 2)?;
        self.set_register_value(MOT_DUR, 80)?;
        self.set_register_value(ZERO_MOT_THR, 156)?;
        self.set_register_value(ZERO_MOT_DUR, 0)?;

        self.set_fifo_enabled(true)?;
        self.reset_dmp()?;
        self.set_dmp_enabled(false)?;
        self.reset_fifo()?;

        // Clear interrupt flags.
        self.get_int_status()?;

        self.set_dmp_enabled(true)?;
        log::info!("DMP running, {} byte packets", DMP_PACKET_SIZE);

        Ok(DMP_PACKET_SIZE)
    }

    /// Check if the DMP (Digital Motion Processor) is enabled.
    ///
    pub fn get_dmp_enabled(&mut self) -> Result<bool, Mpu6050Error<I::Error>> {
        Ok(self.get_register_value(USER_CTRL)? & USER_CTRL_DMP_EN != 0)
    }

    /// Enable or disable the DMP (Digital Motion Processor).
    ///
    pub fn set_dmp_enabled(&mut self, enabled: bool) -> Result<(), Mpu6050Error<I::Error>> {
        let bits = if enabled { USER_CTRL_DMP_EN } else { 0 };
        self.update_register(USER_CTRL, USER_CTRL_DMP_EN, bits)
    }

    pub fn get_fifo_enabled(&mut self) -> Result<bool, Mpu6050Error<I::Error>> {
        Ok(self.get_register_value(USER_CTRL)? & USER_CTRL_FIFO_EN != 0)
    }

    pub fn set_fifo_enabled(&mut self, enabled: bool) -> Result<(), Mpu6050Error<I::Error>> {
        let bits = if enabled { USER_CTRL_FIFO_EN } else { 0 };
        self.update_register(USER_CTRL, USER_CTRL_FIFO_EN, bits)
    }

    /// Drops everything currently buffered in the FIFO. The reset bit clears itself.
    ///
    pub fn reset_fifo(&mut self) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(USER_CTRL, USER_CTRL_FIFO_RESET, USER_CTRL_FIFO_RESET)
    }

    pub fn reset_dmp(&mut self) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(USER_CTRL, USER_CTRL_DMP_RESET, USER_CTRL_DMP_RESET)
    }

    /// Reads (and thereby clears) the interrupt status register.
    ///
    pub fn get_int_status(&mut self) -> Result<u8, Mpu6050Error<I::Error>> {
        self.get_register_value(INT_STATUS)
    }

    /// Gets the number of bytes currently available inside FIFO buffer.
    ///
    pub fn get_fifo_count(&mut self) -> Result<u16, Mpu6050Error<I::Error>> {
        let mut data = [ 0u8; 2 ];
        self.read_registers(FIFO_COUNT_H, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Reads one packet of `packet_size` bytes from the FIFO and then resets the FIFO, so any
    /// backlog that built up in the meantime is thrown away and the next read starts on a
    /// packet boundary. The caller checks `get_fifo_count` first.
    ///
    pub fn pop_dmp_packet(&mut self, packet_size: u16) -> Result<DmpPacket, Mpu6050Error<I::Error>> {
        let len = packet_size as usize;
        if !(DMP_QUATERNION_LEN..=MAX_PACKET_SIZE).contains(&len) {
            return Err(Mpu6050Error::BadPacketSize(packet_size));
        }

        let mut bytes = [ 0u8; MAX_PACKET_SIZE ];
        self.read_registers(FIFO_R_W, &mut bytes[..len])?;
        self.reset_fifo()?;

        DmpPacket::parse(&bytes[..len]).ok_or(Mpu6050Error::BadPacketSize(packet_size))
    }

    /// Re-estimates the gyroscope bias by averaging `samples` raw readings taken while the sensor
    /// is at rest and folding the result into the user offset registers.
    ///
    /// Assumes the ±2000 °/s range set up by `initialize_dmp`, where the offset registers (which
    /// always work at ±1000 °/s) count two steps per output LSB.
    ///
    pub fn calibrate_gyro(&mut self, samples: u16) -> Result<(), Mpu6050Error<I::Error>> {
        let samples = samples.max(1);
        let mut sum = [ 0i32; 3 ];
        for _ in 0..samples {
            let mut raw = [ 0u8; 6 ];
            self.read_registers(GYRO_XOUT_H, &mut raw)?;
            for (axis, total) in sum.iter_mut().enumerate() {
                *total += i16::from_be_bytes([raw[axis * 2], raw[axis * 2 + 1]]) as i32;
            }
            self.delay.delay_ms(2);
        }

        for (axis, register) in [XG_OFFS_USRH, YG_OFFS_USRH, ZG_OFFS_USRH].into_iter().enumerate() {
            let bias = sum[axis] / samples as i32;
            let current = self.get_register_value_i16(register)? as i32;
            let corrected = (current - bias * 2).clamp(i16::MIN as i32, i16::MAX as i32) as i16;
            self.set_register_value_i16(register, corrected)?;
        }
        log::info!("Gyro bias calibrated over {} samples", samples);

        self.reset_fifo()
    }

    pub fn get_register_value(&mut self, register: u8) -> Result<u8, Mpu6050Error<I::Error>> {
        let mut state = [ 0u8 ];
        self.read_registers(register, &mut state)?;
        Ok(state[0])
    }

    pub fn set_register_value(&mut self, register: u8, value: u8) -> Result<(), Mpu6050Error<I::Error>> {
        self.i2c.write(self.address, &[ register, value ]).map_err(Mpu6050Error::I2c)
    }

    /// Read-modify-write of the bits selected by `mask`.
    ///
    pub fn update_register(&mut self, register: u8, mask: u8, bits: u8) -> Result<(), Mpu6050Error<I::Error>> {
        let state = self.get_register_value(register)?;
        self.set_register_value(register, (state & !mask) | (bits & mask))
    }

    /// Reads a signed 16 bit integer from the register and the next register, i.e. to read the
    /// XG_OFFS_USRH and XG_OFFS_USRL registers you should call this method with XG_OFFS_USRH.
    ///
    pub fn get_register_value_i16(&mut self, register: u8) -> Result<i16, Mpu6050Error<I::Error>> {
        let mut state = [ 0u8; 2 ];
        self.read_registers(register, &mut state)?;
        Ok(i16::from_be_bytes(state))
    }

    pub fn set_register_value_i16(&mut self, register: u8, value: i16) -> Result<(), Mpu6050Error<I::Error>> {
        let value = value.to_be_bytes();
        self.i2c.write(self.address, &[ register, value[0], value[1] ]).map_err(Mpu6050Error::I2c)
    }

    fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Mpu6050Error<I::Error>> {
        self.i2c.write_read(self.address, &[ register ], buf).map_err(Mpu6050Error::I2c)
    }

    fn get_otp_bank_valid(&mut self) -> Result<bool, Mpu6050Error<I::Error>> {
        Ok(self.get_register_value(XG_OFFS_TC)? & 0b01 == 1)
    }

    fn set_otp_bank_valid(&mut self, valid: bool) -> Result<(), Mpu6050Error<I::Error>> {
        self.update_register(XG_OFFS_TC, 0b01, valid as u8)
    }

    /// Writes `data` into DMP memory starting at `bank`/`address`, in chunks that never cross a
    /// bank boundary. With the `verify-firmware` feature every chunk is read back afterwards.
    ///
    fn write_memory_block(&mut self, data: &[u8], bank: u8, address: u8) -> Result<(), Mpu6050Error<I::Error>> {
        let mut written: usize = 0;
        let mut current_address = address as u16;
        let mut current_bank = bank;

        while written < data.len()
        {
            let left_in_bank = (DMP_MEMORY_BANK_SIZE - current_address) as usize;
            let chunk_size = DMP_MEMORY_CHUNK_SIZE.min(data.len() - written).min(left_in_bank);
            let chunk = &data[written..written + chunk_size];

            self.set_memory_bank(current_bank, false, false)?;
            self.set_memory_start_address(current_address as u8)?;

            let mut frame = [ 0u8; DMP_MEMORY_CHUNK_SIZE + 1 ];
            frame[0] = DMP_MEM_R_W;
            frame[1..=chunk_size].copy_from_slice(chunk);
            self.i2c.write(self.address, &frame[..=chunk_size]).map_err(Mpu6050Error::I2c)?;

            if cfg!(feature = "verify-firmware") {
                self.verify_memory_chunk(chunk, current_bank, current_address as u8)?;
            }

            written += chunk_size;
            current_address += chunk_size as u16;
            if current_address >= DMP_MEMORY_BANK_SIZE {
                log::debug!("Finished writing to bank: {}", current_bank);
                current_address = 0;
                current_bank += 1;
            }
        }

        Ok(())
    }

    fn verify_memory_chunk(&mut self, chunk: &[u8], bank: u8, address: u8) -> Result<(), Mpu6050Error<I::Error>> {
        let mut readback = [ 0u8; DMP_MEMORY_CHUNK_SIZE ];
        self.set_memory_bank(bank, false, false)?;
        self.set_memory_start_address(address)?;
        self.read_registers(DMP_MEM_R_W, &mut readback[..chunk.len()])?;

        match chunk.iter().zip(readback.iter()).position(|(expected, found)| expected != found) {
            Some(offset) => {
                let address = address + offset as u8;
                log::error!("Verify of DMP memory failed: bank {}, address {}", bank, address);
                Err(Mpu6050Error::DmpVerifyFailed { bank, address })
            }
            None => Ok(()),
        }
    }

    fn set_memory_start_address(&mut self, address: u8) -> Result<(), Mpu6050Error<I::Error>> {
        self.set_register_value(DMP_MEM_START_ADDR, address)
    }

    fn set_memory_bank(&mut self, bank: u8, prefetch: bool, user_bank: bool) -> Result<(), Mpu6050Error<I::Error>> {
        let mut bank = bank & BANK_SEL_MASK;
        if user_bank {
            bank |= BANK_SEL_USER_BANK;
        }
        if prefetch {
            bank |= BANK_SEL_PREFETCH;
        }
        self.set_register_value(DMP_BANK_SEL, bank)
    }
}
