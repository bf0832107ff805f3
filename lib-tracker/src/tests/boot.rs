use super::*;

#[test]
fn test_erased_store_boots_with_factory_defaults() {
    let tracker = boot(MockStore::erased(), MockSensor::absent());

    assert_eq!(*tracker.config(), factory_defaults());
    assert_eq!(tracker.persistence().store().writes, 1);
    assert_eq!(tracker.persistence().store().record(), factory_defaults());

    let net = tracker.net();
    assert_eq!(net.connected_with.unwrap().local_address, FACTORY_ADDRESS);
    assert_eq!(net.connected_with.unwrap().local_subnet, FACTORY_SUBNET);
    assert_eq!(net.bound, Some(SERVICE_PORT));
    assert_eq!(net.announced, vec![("htrk_00".to_string(), SERVICE_PORT)]);
}

#[test]
fn test_clean_store_is_not_rewritten() {
    let tracker = boot(MockStore::with_record(&stored_config()), MockSensor::absent());

    assert_eq!(*tracker.config(), stored_config());
    assert_eq!(tracker.persistence().store().writes, 0);
    assert_eq!(tracker.instance(), "htrk_07");
}

#[test]
fn test_factory_reset_overrides_stored_config() {
    let mut stored = stored_config();
    stored.sampling_freq = 80;
    stored.network_flags.insert(NetworkFlags::DHCP);
    stored.status_flags.insert(StatusFlags::INVERT_X | StatusFlags::INVERT_Z);
    stored.local_address = Ipv4Addr::new(192, 168, 1, 50);

    let board = MockBoard { factory_reset: true, ..MockBoard::default() };
    let tracker = Tracker::boot(
        TrackerSettings::default(),
        MockStore::with_record(&stored),
        MockNet::default(),
        MockSensor::absent(),
        board,
    )
    .unwrap();

    let config = *tracker.config();
    assert_eq!(config.sampling_freq, FACTORY_SAMPLING_FREQ);
    assert!(!config.dhcp());
    assert!(!config.status_flags.intersects(StatusFlags::INVERT_ALL));
    assert_eq!(config.local_address, FACTORY_ADDRESS);
    assert_eq!(config.device_id(), 7);
    assert_eq!(tracker.persistence().store().record(), config);
}

#[test]
fn test_stale_request_flags_are_cleared_durably() {
    let mut stored = stored_config();
    stored.device_flags = DeviceFlags::STREAM_ENABLED | DeviceFlags::RESET | DeviceFlags::SUPPRESS_RESPONSE;

    let tracker = boot(MockStore::with_record(&stored), MockSensor::absent());

    assert!(tracker.config().device_flags.is_empty());
    assert!(!tracker.config().streaming());
    assert_eq!(tracker.persistence().store().writes, 1);
    assert!(tracker.persistence().store().record().device_flags.is_empty());
}

#[test]
fn test_store_read_failure_uses_defaults() {
    let mut store = MockStore::with_record(&stored_config());
    store.fail_reads = true;

    let tracker = boot(store, MockSensor::absent());

    assert_eq!(*tracker.config(), factory_defaults());
}

#[test]
fn test_dhcp_failure_clears_flag_and_fails_boot() {
    init_logger();
    let mut stored = stored_config();
    stored.network_flags.insert(NetworkFlags::DHCP);
    let mut store = MockStore::with_record(&stored);
    let net = MockNet { fail_connect: true, ..MockNet::default() };

    let failed = matches!(
        Tracker::boot(TrackerSettings::default(), &mut store, net, MockSensor::absent(), MockBoard::default()),
        Err(TrackerError::DhcpFailed)
    );

    assert!(failed);
    let persisted = store.record();
    assert!(!persisted.dhcp());
    assert_eq!(persisted.device_id(), 7);
    assert_eq!(persisted.local_address, FACTORY_ADDRESS);
}

#[test]
fn test_static_link_failure() {
    init_logger();
    let net = MockNet { fail_connect: true, ..MockNet::default() };

    let result = Tracker::boot(TrackerSettings::default(), MockStore::erased(), net, MockSensor::absent(), MockBoard::default());

    assert!(matches!(result, Err(TrackerError::LinkFailed)));
}

#[test]
fn test_bind_failure() {
    init_logger();
    let net = MockNet { fail_bind: true, ..MockNet::default() };

    let result = Tracker::boot(TrackerSettings::default(), MockStore::erased(), net, MockSensor::absent(), MockBoard::default());

    assert!(matches!(result, Err(TrackerError::BindFailed(SERVICE_PORT))));
}

#[test]
fn test_instance_names() {
    assert_eq!(instance_name(0).as_str(), "htrk_00");
    assert_eq!(instance_name(7).as_str(), "htrk_07");
    assert_eq!(instance_name(63).as_str(), "htrk_63");
}

#[test]
fn test_indicators_start_off() {
    let tracker = boot(MockStore::erased(), MockSensor::absent());

    for indicator in Indicator::ALL {
        assert!(!tracker.board().level(indicator));
    }
}
