use core::net::{Ipv4Addr, SocketAddrV4};
use crate::*;

/// Size of the configuration record, both on the wire and in the persistent store.
/// 
pub const CONFIG_RECORD_LEN: usize = 20;

/// Complete device configuration. The same record is sent to and from the host in config sync
/// packets and is what the config sync generation keeps in the persistent store.
/// 
/// Layout:
/// 
/// ```text
/// 0       device_flags
/// 1       network_flags
/// 2       status_flags
/// 3       sampling_freq
/// 4..8    target_address
/// 8..10   target_port
/// 10..12  sequence
/// 12..16  local_address
/// 16..20  local_subnet
/// ```
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig
{
    pub device_flags: DeviceFlags,
    pub network_flags: NetworkFlags,
    pub status_flags: StatusFlags,

    /// Orientation samples per second.
    pub sampling_freq: u8,

    /// Where the orientation stream is sent.
    pub target_address: Ipv4Addr,
    pub target_port: u16,

    /// Opaque to the device, echoed back so a host can match replies to its requests.
    pub sequence: u16,

    /// Static address, only used when DHCP is disabled.
    pub local_address: Ipv4Addr,
    pub local_subnet: Ipv4Addr,
}

impl DeviceConfig
{
    /// An all-zero configuration.
    /// 
    pub const fn empty() -> Self {
        DeviceConfig {
            device_flags: DeviceFlags::empty(),
            network_flags: NetworkFlags::empty(),
            status_flags: StatusFlags::empty(),
            sampling_freq: 0,
            target_address: Ipv4Addr::UNSPECIFIED,
            target_port: 0,
            sequence: 0,
            local_address: Ipv4Addr::UNSPECIFIED,
            local_subnet: Ipv4Addr::UNSPECIFIED,
        }
    }

    /// Parses a configuration record, returns `None` if there are fewer than
    /// [`CONFIG_RECORD_LEN`] bytes. Trailing bytes are ignored.
    /// 
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < CONFIG_RECORD_LEN {
            return None;
        }
        Some(DeviceConfig {
            device_flags: DeviceFlags::from_bits_retain(bytes[0]),
            network_flags: NetworkFlags::from_bits_retain(bytes[1]),
            status_flags: StatusFlags::from_bits_retain(bytes[2]),
            sampling_freq: bytes[3],
            target_address: read_addr(&bytes[4..8]),
            target_port: u16::from_le_bytes([bytes[8], bytes[9]]),
            sequence: u16::from_le_bytes([bytes[10], bytes[11]]),
            local_address: read_addr(&bytes[12..16]),
            local_subnet: read_addr(&bytes[16..20]),
        })
    }

    pub fn to_bytes(&self) -> [u8; CONFIG_RECORD_LEN] {
        let mut bytes = [0u8; CONFIG_RECORD_LEN];
        bytes[0] = self.device_flags.bits();
        bytes[1] = self.network_flags.bits();
        bytes[2] = self.status_flags.bits();
        bytes[3] = self.sampling_freq;
        bytes[4..8].copy_from_slice(&self.target_address.octets());
        bytes[8..10].copy_from_slice(&self.target_port.to_le_bytes());
        bytes[10..12].copy_from_slice(&self.sequence.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.local_address.octets());
        bytes[16..20].copy_from_slice(&self.local_subnet.octets());
        bytes
    }

    /// The copy of this configuration that may be written to the persistent store: request
    /// flags and live sensor state are cleared.
    /// 
    pub fn durable(&self) -> Self {
        let mut durable = *self;
        durable.device_flags.remove(DeviceFlags::TRANSIENT);
        durable.status_flags.remove(StatusFlags::LIVE);
        durable
    }

    #[inline]
    pub fn streaming(&self) -> bool {
        self.device_flags.contains(DeviceFlags::STREAM_ENABLED)
    }

    #[inline]
    pub fn dhcp(&self) -> bool {
        self.network_flags.contains(NetworkFlags::DHCP)
    }

    /// Device id sent along with every data packet.
    /// 
    #[inline]
    pub fn device_id(&self) -> u16 {
        self.network_flags.device_id() as u16
    }

    /// Destination of the orientation stream.
    /// 
    pub fn target(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.target_address, self.target_port)
    }

    pub fn set_target(&mut self, target: SocketAddrV4) {
        self.target_address = *target.ip();
        self.target_port = target.port();
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::empty()
    }
}

#[inline]
pub(crate) fn read_addr(bytes: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3])
}
