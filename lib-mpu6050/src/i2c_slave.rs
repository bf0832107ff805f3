/// Auxiliary i2c slave slots of the MPU's built in i2c master. The DMP setup sequence pokes
/// slot 0 even though nothing is wired to the auxiliary bus.
/// 
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum I2cSlave
{
    Slave0 = 0,
    Slave1 = 1,
    Slave2 = 2,
    Slave3 = 3,
}

impl I2cSlave {

    /// Address register of this slot, each slot owns three consecutive registers.
    /// 
    pub fn address_register(self) -> u8 {
        crate::registers::I2C_SLV0_ADDR + (self as u8) * 3
    }
}
