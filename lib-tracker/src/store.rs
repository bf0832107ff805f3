use protocol::{DeviceConfig, Generation, NetworkFlags, StartupAddress, CONFIG_RECORD_LEN};

use crate::{factory_defaults, ConfigStore};

/// Legacy layout: one DHCP byte followed by the static address and subnet.
pub const LEGACY_DHCP_OFFSET: usize = 0;
pub const LEGACY_ADDRESS_OFFSET: usize = 1;
pub const LEGACY_RECORD_LEN: usize = 1 + StartupAddress::LEN;

/// Config sync layout: the whole [`DeviceConfig`] record at offset 0.
pub const CONFIG_RECORD_OFFSET: usize = 0;

/// Erased flash reads back as all ones.
const ERASED: u8 = 0xFF;

/// The persisted configuration, in the layout of one protocol generation. Writes are fire and
/// forget: failures are logged and otherwise ignored.
/// 
pub struct Persistence<S> {
    store: S,
    layout: Generation,
}

impl<S: ConfigStore> Persistence<S> {
    pub fn new(store: S, layout: Generation) -> Self {
        Persistence { store, layout }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the persisted configuration. `None` when the store is erased or unreadable.
    /// The legacy layout only holds the network settings, everything else comes from the
    /// factory defaults.
    /// 
    pub fn load(&mut self) -> Option<DeviceConfig> {
        match self.layout {
            Generation::ConfigSync => {
                let mut record = [0u8; CONFIG_RECORD_LEN];
                self.read(CONFIG_RECORD_OFFSET, &mut record)?;
                DeviceConfig::from_bytes(&record)
            }
            Generation::Legacy => {
                let mut record = [0u8; LEGACY_RECORD_LEN];
                self.read(LEGACY_DHCP_OFFSET, &mut record)?;
                let startup = StartupAddress::parse(&record[LEGACY_ADDRESS_OFFSET..])?;

                let mut config = factory_defaults();
                config.network_flags.set(NetworkFlags::DHCP, record[LEGACY_DHCP_OFFSET] != 0);
                config.local_address = startup.address;
                config.local_subnet = startup.subnet;
                Some(config)
            }
        }
    }

    /// Writes the durable part of `config`, transient flags never reach the store.
    /// 
    pub fn save(&mut self, config: &DeviceConfig) {
        match self.layout {
            Generation::ConfigSync => {
                let record = config.durable().to_bytes();
                self.write(CONFIG_RECORD_OFFSET, &record);
            }
            Generation::Legacy => {
                let startup = StartupAddress { address: config.local_address, subnet: config.local_subnet };
                self.write_legacy(config.dhcp(), &startup);
            }
        }
    }

    /// Sets the persisted DHCP flag of the legacy layout. The whole record is rewritten, with the
    /// factory address when no valid address is stored.
    /// 
    pub fn persist_dhcp(&mut self, enabled: bool) {
        let startup = self.startup_address().unwrap_or_else(|| {
            let defaults = factory_defaults();
            StartupAddress { address: defaults.local_address, subnet: defaults.local_subnet }
        });
        self.write_legacy(enabled, &startup);
    }

    /// Persists a new static address and subnet in the legacy layout and disables DHCP, so the
    /// address is used from the next boot on.
    /// 
    pub fn persist_startup_address(&mut self, startup: &StartupAddress) {
        self.write_legacy(false, startup);
    }

    /// Static address and subnet as currently persisted.
    /// 
    pub fn startup_address(&mut self) -> Option<StartupAddress> {
        self.load().map(|config| StartupAddress { address: config.local_address, subnet: config.local_subnet })
    }

    fn write_legacy(&mut self, dhcp: bool, startup: &StartupAddress) {
        let mut record = [0u8; LEGACY_RECORD_LEN];
        record[LEGACY_DHCP_OFFSET] = dhcp as u8;
        record[LEGACY_ADDRESS_OFFSET..].copy_from_slice(&startup.to_bytes());
        self.write(LEGACY_DHCP_OFFSET, &record);
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Option<()> {
        if let Err(e) = self.store.read(offset, buf) {
            log::warn!("Config store read at {} failed: {:?}", offset, e);
            return None;
        }
        if buf.iter().all(|b| *b == ERASED) {
            log::info!("Config store is erased");
            return None;
        }
        Some(())
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) {
        match self.store.write(offset, bytes) {
            Ok(()) => log::debug!("Stored {} bytes at {}", bytes.len(), offset),
            Err(e) => log::warn!("Config store write at {} failed: {:?}", offset, e),
        }
    }
}
