#![no_std]
#![no_main]

use cfg_if::cfg_if;
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    gpio::{Input, Level, Output, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    prelude::*,
    reset::software_reset,
    rng::Rng,
    time,
    timer::timg::TimerGroup,
};
use esp_wifi::wifi::{utils::create_network_interface, WifiStaDevice};
use esp_wifi::wifi_interface::WifiStack;
use mpu6050::Mpu6050;
use protocol::{Generation, SampleFormat};
use smoltcp::iface::{SocketSet, SocketStorage};
use smoltcp::socket::{dhcpv4, udp};
use tracker::{Control, Tracker, TrackerSettings};

mod board;
mod error;
mod network;
mod storage;

use board::Pins;
use error::AppError;
use network::NetStack;
use storage::FlashStore;

/// MotionApps 2.0 DMP firmware, supplied at build time because it cannot be redistributed.
static DMP_IMAGE: &[u8] = include_bytes!(env!("DMP_IMAGE"));

fn now_ms() -> u64 {
    time::now().duration_since_epoch().to_millis()
}

fn settings() -> TrackerSettings {
    let mut settings = TrackerSettings::default();
    cfg_if! { if #[cfg(feature = "legacy-protocol")] {
        settings.generation = Generation::Legacy;
    } else {
        settings.generation = Generation::ConfigSync;
    }}
    cfg_if! { if #[cfg(feature = "float-samples")] {
        settings.format = SampleFormat::Float;
    } else {
        settings.format = SampleFormat::Fixed;
    }}
    settings
}

#[entry]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let peripherals = esp_hal::init({
        let mut config = esp_hal::Config::default();
        config.cpu_clock = CpuClock::max();
        config
    });

    esp_alloc::heap_allocator!(72 * 1024);


    // Status LEDs and the factory reset jumper
    // ============================================================================================
    let pins;
    cfg_if! { if #[cfg(feature = "old-pins")] {
        pins = Pins::new(
            Output::new(peripherals.GPIO4, Level::Low),
            Output::new(peripherals.GPIO3, Level::Low),
            Output::new(peripherals.GPIO10, Level::Low),
            Input::new(peripherals.GPIO9, Pull::Up),
        );
    } else {
        pins = Pins::new(
            Output::new(peripherals.GPIO4, Level::Low),
            Output::new(peripherals.GPIO3, Level::Low),
            Output::new(peripherals.GPIO2, Level::Low),
            Input::new(peripherals.GPIO9, Pull::Up),
        );
    }}


    // I2C connection for the MPU6050
    // ============================================================================================
    let mut i2c = I2c::new(
        peripherals.I2C0,
        I2cConfig {
            frequency: 400.kHz(),
            timeout: Some(120),
        }
    );
    cfg_if! {
        if #[cfg(feature = "old-pins")] {
            i2c = i2c.with_sda(peripherals.GPIO1);
            i2c = i2c.with_scl(peripherals.GPIO2);
        }
        else {
            i2c = i2c.with_sda(peripherals.GPIO8);
            i2c = i2c.with_scl(peripherals.GPIO7);
        }
    }
    let mpu = Mpu6050::new(i2c, Delay::new(), DMP_IMAGE);


    // WiFi and the smoltcp stack
    // ============================================================================================
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let wifi_controller = match esp_wifi::init(timg0.timer0, Rng::new(peripherals.RNG), peripherals.RADIO_CLK) {
        Ok(controller) => controller,
        Err(err) => halt(AppError::from(err)),
    };
    let (iface, device, controller) = match create_network_interface(&wifi_controller, peripherals.WIFI, WifiStaDevice) {
        Ok(parts) => parts,
        Err(err) => halt(AppError::from(err)),
    };

    let mut socket_storage: [SocketStorage; 4] = Default::default();
    let mut sockets = SocketSet::new(&mut socket_storage[..]);
    sockets.add(dhcpv4::Socket::new());
    let stack = WifiStack::new(iface, device, sockets, now_ms);

    let mut service_rx_meta = [udp::PacketMetadata::EMPTY; 4];
    let mut service_rx = [0u8; 1024];
    let mut service_tx_meta = [udp::PacketMetadata::EMPTY; 8];
    let mut service_tx = [0u8; 1024];
    let service = stack.get_udp_socket(&mut service_rx_meta, &mut service_rx, &mut service_tx_meta, &mut service_tx);

    let mut mdns_rx_meta = [udp::PacketMetadata::EMPTY; 1];
    let mut mdns_rx = [0u8; 512];
    let mut mdns_tx_meta = [udp::PacketMetadata::EMPTY; 2];
    let mut mdns_tx = [0u8; 1024];
    let mdns = stack.get_udp_socket(&mut mdns_rx_meta, &mut mdns_rx, &mut mdns_tx_meta, &mut mdns_tx);

    let net = NetStack::new(&stack, controller, service, mdns);


    // Main program loop
    // ============================================================================================
    let mut tracker = match Tracker::boot(settings(), FlashStore::new(), net, mpu, pins) {
        Ok(tracker) => tracker,
        Err(err) => halt(AppError::from(err)),
    };
    log::info!("Tracker {} running", tracker.instance());

    loop {
        if tracker.tick(now_ms()) == Control::Reset {
            tracker.net_mut().flush();
            software_reset();
        }
    }
}

/// Every error we cannot continue from ends in a reset, the next boot starts from the persisted
/// configuration again.
///
fn halt(err: AppError) -> ! {
    log::error!("{}, resetting", err);
    Delay::new().delay_millis(1000);
    software_reset();
    loop {}
}
