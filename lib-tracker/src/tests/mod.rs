use std::net::{Ipv4Addr, SocketAddrV4};

use log::LevelFilter;
pub use math::Quaternion;
use protocol::*;

use crate::*;

mod boot;
mod legacy;

pub use mocks::*;

pub type TestTracker = Tracker<MockStore, MockNet, MockSensor, MockBoard>;

/// Control host that sends configuration packets.
pub const HOST: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 2), 40000);

/// Where the orientation stream goes.
pub const VIEWER: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 3), 9000);

fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Error)
        .filter(Some("lib_tracker"), LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// A sane persisted configuration: device 7, streaming target set, not streaming.
pub fn stored_config() -> DeviceConfig {
    let mut config = factory_defaults();
    config.network_flags = NetworkFlags::empty().with_device_id(7);
    config.set_target(VIEWER);
    config
}

pub fn boot_with(settings: TrackerSettings, store: MockStore, sensor: MockSensor) -> TestTracker {
    init_logger();
    Tracker::boot(settings, store, MockNet::default(), sensor, MockBoard::default()).unwrap()
}

pub fn boot(store: MockStore, sensor: MockSensor) -> TestTracker {
    boot_with(TrackerSettings::default(), store, sensor)
}

pub fn config_packet(config: &DeviceConfig) -> Vec<u8> {
    let mut out = PacketBuf::new();
    Codec::default().encode_config(config, &mut out).unwrap();
    out.to_vec()
}

pub fn decode_config(bytes: &[u8]) -> DeviceConfig {
    match Codec::default().decode(bytes).unwrap() {
        Packet::Config(config) => config,
        other => panic!("expected config packet, got {:?}", other),
    }
}

/// Delivers `config` from the host and runs one tick at `now_ms`.
pub fn send_config(tracker: &mut TestTracker, config: &DeviceConfig, now_ms: u64) -> Control {
    tracker.net_mut().deliver(&config_packet(config), HOST);
    tracker.tick(now_ms)
}

/// Responses sent to the host since the last call, decoded.
pub fn host_replies(tracker: &mut TestTracker) -> Vec<DeviceConfig> {
    tracker
        .net_mut()
        .take_sent()
        .into_iter()
        .filter(|(destination, _)| *destination == HOST)
        .map(|(_, bytes)| decode_config(&bytes))
        .collect()
}
