use core::net::Ipv4Addr;

use protocol::{Codec, DeviceConfig, Generation, NetworkFlags, SampleFormat, SERVICE_PORT};

/// Static address used after a factory reset.
pub const FACTORY_ADDRESS: Ipv4Addr = Ipv4Addr::new(169, 254, 145, 23);
pub const FACTORY_SUBNET: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
pub const FACTORY_SAMPLING_FREQ: u8 = 25;

pub const MIN_SAMPLING_FREQ: u8 = 1;
pub const MAX_SAMPLING_FREQ: u8 = 100;

/// Configuration after a factory reset: link local static address, DHCP off, 25 Hz, no axis
/// inversion, not streaming.
/// 
pub fn factory_defaults() -> DeviceConfig {
    DeviceConfig {
        local_address: FACTORY_ADDRESS,
        local_subnet: FACTORY_SUBNET,
        sampling_freq: FACTORY_SAMPLING_FREQ,
        ..DeviceConfig::empty()
    }
}

/// Factory defaults that keep the device id of `previous`, so a reset board still advertises
/// under its old name.
/// 
pub fn factory_defaults_for(previous: &DeviceConfig) -> DeviceConfig {
    let mut config = factory_defaults();
    config.network_flags = NetworkFlags::empty().with_device_id(previous.network_flags.device_id());
    config
}

/// Time between two samples for the given rate, the rate is clamped to 1..=100 Hz first.
/// 
pub fn sample_period_ms(sampling_freq: u8) -> u64 {
    1000 / sampling_freq.clamp(MIN_SAMPLING_FREQ, MAX_SAMPLING_FREQ) as u64
}

/// Knobs the firmware picks at build time.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub generation: Generation,
    pub format: SampleFormat,

    /// Period of the IMU connectivity check.
    pub check_period_ms: u64,

    /// Local UDP port for control and data.
    pub service_port: u16,

    /// How often the service advertisement is repeated.
    pub advertise_period_ms: u64,
}

impl TrackerSettings {
    pub fn codec(&self) -> Codec {
        Codec::new(self.generation, self.format)
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        TrackerSettings {
            generation: Generation::ConfigSync,
            format: SampleFormat::Fixed,
            check_period_ms: 500,
            service_port: SERVICE_PORT,
            advertise_period_ms: 60_000,
        }
    }
}
