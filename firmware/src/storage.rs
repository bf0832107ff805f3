use embedded_storage::{ReadStorage, Storage};
use esp_storage::{FlashStorage, FlashStorageError};
use tracker::ConfigStore;

/// Start of the `nvs` partition in the default partition table, the configuration record lives
/// at the beginning of it.
/// 
pub const CONFIG_FLASH_OFFSET: u32 = 0x9000;

/// The tracker's persistent store on the internal flash.
/// 
pub struct FlashStore
{
    flash: FlashStorage,
}

impl FlashStore {
    pub fn new() -> Self {
        FlashStore { flash: FlashStorage::new() }
    }
}

impl ConfigStore for FlashStore {
    type Error = FlashStorageError;

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.flash.read(CONFIG_FLASH_OFFSET + offset as u32, buf)
    }

    /// Erases and rewrites the whole sector around the record, keep writes rare.
    /// 
    fn write(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Self::Error> {
        self.flash.write(CONFIG_FLASH_OFFSET + offset as u32, bytes)
    }
}
