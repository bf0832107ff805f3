pub const XG_OFFS_TC: u8 = 0x00; //[7] PWR_MODE, [6:1] XG_OFFS_TC, [0] OTP_BNK_VLD

pub const XG_OFFS_USRH: u8 = 0x13; //[15:0] XG_OFFS_USR
pub const YG_OFFS_USRH: u8 = 0x15; //[15:0] YG_OFFS_USR
pub const ZG_OFFS_USRH: u8 = 0x17; //[15:0] ZG_OFFS_USR

pub const SMPLRT_DIV: u8 = 0x19;

pub const CONFIG: u8 = 0x1A;
pub const GYRO_CONFIG: u8 = 0x1B;

pub const MOT_THR: u8 = 0x1F;
pub const MOT_DUR: u8 = 0x20;
pub const ZERO_MOT_THR: u8 = 0x21;
pub const ZERO_MOT_DUR: u8 = 0x22;

pub const I2C_SLV0_ADDR: u8 = 0x25;

pub const INT_ENABLE: u8 = 0x38;
pub const INT_STATUS: u8 = 0x3A;

pub const GYRO_XOUT_H: u8 = 0x43;

pub const USER_CTRL: u8 = 0x6A;
pub const PWR_MGMT_1: u8 = 0x6B;

pub const DMP_BANK_SEL: u8 = 0x6D;
pub const DMP_MEM_START_ADDR: u8 = 0x6E;
pub const DMP_MEM_R_W: u8 = 0x6F;
pub const DMP_CFG_1: u8 = 0x70;
pub const DMP_CFG_2: u8 = 0x71;

pub const FIFO_COUNT_H: u8 = 0x72;
pub const FIFO_COUNT_L: u8 = 0x73;
pub const FIFO_R_W: u8 = 0x74;

pub const WHO_AM_I: u8 = 0x75;

// INT_ENABLE / INT_STATUS bits
pub const INT_DATA_RDY: u8 = 1 << 0;
pub const INT_DMP: u8 = 1 << 1;
pub const INT_FIFO_OFLOW: u8 = 1 << 4;

// USER_CTRL bits
pub const USER_CTRL_DMP_EN: u8 = 1 << 7;
pub const USER_CTRL_FIFO_EN: u8 = 1 << 6;
pub const USER_CTRL_I2C_MST_EN: u8 = 1 << 5;
pub const USER_CTRL_DMP_RESET: u8 = 1 << 3;
pub const USER_CTRL_FIFO_RESET: u8 = 1 << 2;
pub const USER_CTRL_I2C_MST_RESET: u8 = 1 << 1;

// PWR_MGMT_1 bits
pub const PWR_MGMT_1_DEVICE_RESET: u8 = 1 << 7;
pub const PWR_MGMT_1_SLEEP: u8 = 1 << 6;

// DMP memory bank select bits
pub const BANK_SEL_PREFETCH: u8 = 1 << 6;
pub const BANK_SEL_USER_BANK: u8 = 1 << 5;
pub const BANK_SEL_MASK: u8 = 0x1F;
