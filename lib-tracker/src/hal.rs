use core::fmt::Debug;
use core::net::{Ipv4Addr, SocketAddrV4};

use math::Quaternion;
use protocol::DeviceConfig;

/// Byte addressable non volatile memory. Multi byte writes are not atomic.
/// 
pub trait ConfigStore {
    type Error: Debug;

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<T: ConfigStore> ConfigStore for &mut T {
    type Error = T::Error;

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(offset, bytes)
    }
}

/// Metadata of a received datagram.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datagram {
    /// Size of the datagram as it arrived, may be larger than the buffer it was copied into.
    pub len: usize,
    pub source: SocketAddrV4,
}

/// Connectionless datagram socket bound to the service port.
/// 
pub trait Transport {
    type Error: Debug;

    fn begin(&mut self, local_port: u16) -> Result<(), Self::Error>;

    fn send(&mut self, destination: SocketAddrV4, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Copies the next pending datagram into `buf`, never blocks. Bytes past `buf.len()` are
    /// discarded but still counted in [`Datagram::len`].
    fn try_receive(&mut self, buf: &mut [u8]) -> Result<Option<Datagram>, Self::Error>;
}

/// Brings the network interface up and keeps it running.
/// 
pub trait NetworkLink {
    type Error: Debug;

    /// Configures the interface from `config`: DHCP when its DHCP flag is set, otherwise the
    /// static address and subnet. May block during boot. Returns the address in use.
    fn connect(&mut self, config: &DeviceConfig) -> Result<Ipv4Addr, Self::Error>;

    /// Lease renewal and other background work, called once per tick.
    fn maintain(&mut self, now_ms: u64);
}

/// DNS-SD style advertisement of the control port.
/// 
pub trait ServiceAdvertiser {
    type Error: Debug;

    fn announce(&mut self, instance: &str, port: u16) -> Result<(), Self::Error>;

    /// Withdraws the last announcement, sent right before a deliberate reset.
    fn withdraw(&mut self) -> Result<(), Self::Error>;
}

/// IMU that delivers fused orientation quaternions out of a FIFO.
/// 
pub trait MotionSensor {
    type Error: Debug;

    /// Reads the identity register, `Ok(false)` means something answered but it is not the
    /// expected chip.
    fn probe(&mut self) -> Result<bool, Self::Error>;

    /// Loads and starts the motion processor, returns the size of one FIFO packet.
    fn initialize(&mut self) -> Result<u16, Self::Error>;

    fn interrupt_pending(&mut self) -> Result<bool, Self::Error>;

    /// Bytes currently buffered in the FIFO.
    fn fifo_len(&mut self) -> Result<u16, Self::Error>;

    /// Pops one packet of `packet_size` bytes and discards whatever else is buffered.
    fn pop_sample(&mut self, packet_size: u16) -> Result<Quaternion, Self::Error>;

    /// Re-estimates the gyro bias, the sensor has to be at rest.
    fn calibrate(&mut self) -> Result<(), Self::Error>;
}

/// Status outputs of the board.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Heartbeat, toggles on every connectivity check.
    Device,
    /// Toggles on every data packet sent.
    Network,
    /// Sensor found, or toggling at the sample rate while streaming.
    Imu,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Device, Indicator::Network, Indicator::Imu];
}

pub trait Board {
    /// State of the factory reset input, sampled once during boot.
    fn factory_reset_requested(&mut self) -> bool;

    fn set_indicator(&mut self, indicator: Indicator, on: bool);
}
