
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation};

use crate::registers::*;
use crate::MPU6050_WHO_AM_I;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusError;

impl i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Register level stand in for an MPU6050 on the bus: a flat register file, 32 banks of DMP
/// memory and a byte FIFO, with the auto increment and self clearing bits of the real chip.
pub struct FakeMpu {
    pub registers: [u8; 128],
    pub memory: Vec<u8>,
    pub fifo: Vec<u8>,
    pub present: bool,
    pub corrupt_memory: bool,
    pointer: u8,
    memory_address: u8,
}

impl FakeMpu {
    pub fn new() -> Self {
        let mut registers = [0u8; 128];
        registers[WHO_AM_I as usize] = MPU6050_WHO_AM_I;
        FakeMpu {
            registers,
            memory: vec![0u8; 32 * 256],
            fifo: Vec::new(),
            present: true,
            corrupt_memory: false,
            pointer: 0,
            memory_address: 0,
        }
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    fn memory_index(&self) -> usize {
        (self.register(DMP_BANK_SEL) & BANK_SEL_MASK) as usize * 256 + self.memory_address as usize
    }

    fn write(&mut self, register: u8, value: u8) {
        match register {
            PWR_MGMT_1 if value & PWR_MGMT_1_DEVICE_RESET != 0 => {
                let identity = self.register(WHO_AM_I);
                self.registers = [0u8; 128];
                self.registers[WHO_AM_I as usize] = identity;
                self.registers[PWR_MGMT_1 as usize] = PWR_MGMT_1_SLEEP;
            }
            USER_CTRL => {
                if value & USER_CTRL_FIFO_RESET != 0 {
                    self.fifo.clear();
                }
                let self_clearing = USER_CTRL_FIFO_RESET | USER_CTRL_DMP_RESET | USER_CTRL_I2C_MST_RESET;
                self.registers[USER_CTRL as usize] = value & !self_clearing;
            }
            DMP_MEM_START_ADDR => {
                self.memory_address = value;
                self.registers[register as usize] = value;
            }
            DMP_MEM_R_W => {
                let index = self.memory_index();
                self.memory[index] = if self.corrupt_memory { !value } else { value };
                self.memory_address = self.memory_address.wrapping_add(1);
            }
            _ => self.registers[(register & 0x7F) as usize] = value,
        }
    }

    fn read(&mut self, register: u8) -> u8 {
        match register {
            FIFO_COUNT_H => (self.fifo.len() >> 8) as u8,
            FIFO_COUNT_L => self.fifo.len() as u8,
            FIFO_R_W if self.fifo.is_empty() => 0,
            FIFO_R_W => self.fifo.remove(0),
            DMP_MEM_R_W => {
                let value = self.memory[self.memory_index()];
                self.memory_address = self.memory_address.wrapping_add(1);
                value
            }
            INT_STATUS => core::mem::take(&mut self.registers[INT_STATUS as usize]),
            _ => self.register(register & 0x7F),
        }
    }

    fn advance(&mut self) {
        if self.pointer != FIFO_R_W && self.pointer != DMP_MEM_R_W {
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl ErrorType for FakeMpu {
    type Error = BusError;
}

impl I2c for FakeMpu {
    fn transaction(&mut self, _address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if !self.present {
            return Err(BusError);
        }
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    if let Some((register, data)) = bytes.split_first() {
                        self.pointer = *register;
                        for value in data {
                            self.write(self.pointer, *value);
                            self.advance();
                        }
                    }
                }
                Operation::Read(buffer) => {
                    for value in buffer.iter_mut() {
                        *value = self.read(self.pointer);
                        self.advance();
                    }
                }
            }
        }
        Ok(())
    }
}
