use super::*;

fn settings() -> TrackerSettings {
    TrackerSettings { generation: Generation::Legacy, ..TrackerSettings::default() }
}

fn codec() -> Codec {
    Codec::new(Generation::Legacy, SampleFormat::Fixed)
}

fn frame(kind: MessageType, payload: &[u8]) -> Vec<u8> {
    let mut out = PacketBuf::new();
    codec().encode_frame(kind, payload, &mut out).unwrap();
    out.to_vec()
}

/// Decodes every frame sent so far as `(destination, kind, payload)`.
fn sent_frames(tracker: &mut TestTracker) -> Vec<(SocketAddrV4, MessageType, Vec<u8>)> {
    tracker
        .net_mut()
        .take_sent()
        .into_iter()
        .map(|(destination, bytes)| match codec().decode(&bytes).unwrap() {
            Packet::Frame(frame) => (destination, frame.kind, frame.payload.to_vec()),
            other => panic!("expected a frame, got {:?}", other),
        })
        .collect()
}

fn legacy_store(dhcp: u8, address: [u8; 4], subnet: [u8; 4]) -> MockStore {
    let mut store = MockStore::erased();
    store.bytes[0] = dhcp;
    store.bytes[1..5].copy_from_slice(&address);
    store.bytes[5..9].copy_from_slice(&subnet);
    store
}

fn booted() -> TestTracker {
    boot_with(settings(), legacy_store(0, [10, 0, 0, 9], [255, 255, 0, 0]), MockSensor::absent())
}

#[test]
fn test_boot_reads_legacy_layout() {
    let tracker = booted();

    let config = tracker.config();
    assert!(!config.dhcp());
    assert_eq!(config.local_address, Ipv4Addr::new(10, 0, 0, 9));
    assert_eq!(config.local_subnet, Ipv4Addr::new(255, 255, 0, 0));
    assert_eq!(config.sampling_freq, FACTORY_SAMPLING_FREQ);
    assert_eq!(tracker.persistence().store().writes, 0);
}

#[test]
fn test_erased_legacy_store_gets_defaults() {
    let tracker = boot_with(settings(), MockStore::erased(), MockSensor::absent());

    let bytes = &tracker.persistence().store().bytes;
    assert_eq!(bytes[0], 0);
    assert_eq!(&bytes[1..5], &FACTORY_ADDRESS.octets());
    assert_eq!(&bytes[5..9], &FACTORY_SUBNET.octets());
}

#[test]
fn test_alive_request_is_echoed() {
    let mut tracker = booted();

    tracker.net_mut().deliver(&frame(MessageType::AliveRequest, b"ping 42"), HOST);
    let _ = tracker.tick(0);

    assert_eq!(sent_frames(&mut tracker), vec![(HOST, MessageType::AliveResponse, b"ping 42".to_vec())]);
}

#[test]
fn test_set_startup_address_persists_and_confirms() {
    let mut tracker = booted();
    let payload = [192, 168, 0, 20, 255, 255, 255, 0];

    tracker.net_mut().deliver(&frame(MessageType::SetStartupAddress, &payload), HOST);
    let _ = tracker.tick(0);

    let bytes = &tracker.persistence().store().bytes;
    assert_eq!(bytes[0], 0);
    assert_eq!(&bytes[1..9], &payload);
    assert_eq!(sent_frames(&mut tracker), vec![(HOST, MessageType::StartupAddressConfirm, payload.to_vec())]);
    // Takes effect on the next boot only.
    assert_eq!(tracker.config().local_address, Ipv4Addr::new(10, 0, 0, 9));
}

#[test]
fn test_set_startup_address_forces_dhcp_off() {
    let mut tracker = boot_with(settings(), legacy_store(1, [10, 0, 0, 9], [255, 0, 0, 0]), MockSensor::absent());

    tracker.net_mut().deliver(&frame(MessageType::SetStartupAddress, &[10, 1, 1, 1, 255, 255, 255, 0]), HOST);
    let _ = tracker.tick(0);

    assert_eq!(tracker.persistence().store().bytes[0], 0);
}

#[test]
fn test_short_startup_address_is_a_no_op() {
    let mut tracker = booted();
    let before = tracker.persistence().store().bytes.clone();

    tracker.net_mut().deliver(&frame(MessageType::SetStartupAddress, &[192, 168, 0, 20]), HOST);
    let _ = tracker.tick(0);

    assert_eq!(tracker.persistence().store().bytes, before);
    assert!(tracker.net().sent.is_empty());
}

#[test]
fn test_set_dhcp_goes_straight_to_the_store() {
    let mut tracker = booted();

    tracker.net_mut().deliver(&frame(MessageType::SetDhcpEnabled, &[1]), HOST);
    let _ = tracker.tick(0);

    assert_eq!(tracker.persistence().store().bytes[0], 1);
    assert_eq!(&tracker.persistence().store().bytes[1..5], &[10, 0, 0, 9]);
    assert!(!tracker.config().dhcp());
    assert!(tracker.net().sent.is_empty());

    tracker.net_mut().deliver(&frame(MessageType::SetDhcpEnabled, &[0]), HOST);
    let _ = tracker.tick(1);
    assert_eq!(tracker.persistence().store().bytes[0], 0);
}

#[test]
fn test_set_dhcp_on_erased_store_writes_whole_record() {
    let mut persistence = Persistence::new(MockStore::erased(), Generation::Legacy);

    persistence.persist_dhcp(true);

    let config = persistence.load().unwrap();
    assert!(config.dhcp());
    assert_eq!(config.local_address, FACTORY_ADDRESS);
    assert_eq!(config.local_subnet, FACTORY_SUBNET);
    assert_eq!(persistence.store().writes, 1);
}

#[test]
fn test_stream_enable_targets_sender() {
    let mut tracker = booted();

    tracker.net_mut().deliver(&frame(MessageType::StreamEnable, &[]), VIEWER);
    let _ = tracker.tick(0);

    assert!(tracker.config().streaming());
    assert_eq!(tracker.config().target(), VIEWER);
    assert_eq!(sent_frames(&mut tracker), vec![(VIEWER, MessageType::StreamEnableResponse, vec![])]);

    tracker.net_mut().deliver(&frame(MessageType::StreamDisable, &[]), HOST);
    let _ = tracker.tick(1);

    assert!(!tracker.config().streaming());
    assert_eq!(tracker.config().target(), VIEWER);
    assert_eq!(sent_frames(&mut tracker), vec![(HOST, MessageType::StreamDisableResponse, vec![])]);
}

#[test]
fn test_reset_frame_resets() {
    let mut tracker = booted();

    tracker.net_mut().deliver(&frame(MessageType::Reset, &[]), HOST);

    assert_eq!(tracker.tick(0), Control::Reset);
    assert!(tracker.net().sent.is_empty());
    assert_eq!(tracker.net().withdrawn, 1);
}

#[test]
fn test_device_bound_types_are_ignored() {
    let mut tracker = booted();

    for kind in [MessageType::Error, MessageType::AliveResponse, MessageType::StreamEnableResponse] {
        tracker.net_mut().deliver(&frame(kind, &[]), HOST);
        assert_eq!(tracker.tick(0), Control::Continue);
    }

    assert!(tracker.net().sent.is_empty());
}

#[test]
fn test_samples_use_stream_data_frames() {
    let mut tracker = boot_with(settings(), legacy_store(0, [10, 0, 0, 9], [255, 255, 0, 0]), MockSensor::present());
    tracker.net_mut().deliver(&frame(MessageType::StreamEnable, &[]), VIEWER);
    let _ = tracker.tick(0);
    let _ = tracker.tick(500);
    tracker.net_mut().take_sent();

    tracker.sensor_mut().buffer(Quaternion::new(0.0, 1.0, 0.0, 0.0));
    let _ = tracker.tick(540);

    let sent = tracker.net_mut().take_sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, VIEWER);
    assert_eq!(sent[0].1[MAGIC_LEN], MessageType::StreamData as u8);

    match codec().decode(&sent[0].1).unwrap() {
        Packet::Data(data) => assert_eq!(data.sample, Sample::Fixed([0, 16384, 0, 0])),
        other => panic!("expected a data frame, got {:?}", other),
    }
}
