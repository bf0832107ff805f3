use core::fmt::Write;

use protocol::{DeviceConfig, NetworkFlags, MAX_DATAGRAM_LEN};

use crate::*;

/// Service instance name, `htrk_NN`.
pub type InstanceName = heapless::String<16>;

pub fn instance_name(device_id: u16) -> InstanceName {
    let mut name = InstanceName::new();
    // Ids are at most 63, always fits.
    let _ = write!(name, "htrk_{:02}", device_id);
    name
}

/// Last driven level of every indicator.
#[derive(Debug, Clone, Copy, Default)]
struct Indicators {
    levels: [bool; 3],
}

impl Indicators {
    fn set<B: Board>(&mut self, board: &mut B, indicator: Indicator, on: bool) {
        self.levels[indicator as usize] = on;
        board.set_indicator(indicator, on);
    }

    fn toggle<B: Board>(&mut self, board: &mut B, indicator: Indicator) {
        let on = !self.levels[indicator as usize];
        self.set(board, indicator, on);
    }
}

/// The whole device: owns the collaborators and the core state, and advances everything from a
/// single non blocking [`Tracker::tick`].
///
/// `N` is the network stack, which provides the link, the service socket and the advertisement.
///
pub struct Tracker<S, N, M, B> {
    settings: TrackerSettings,
    persistence: Persistence<S>,
    net: N,
    sensor: M,
    board: B,

    session: Session,
    link: SensorLink,
    orientation: Orientation,
    indicators: Indicators,
    instance: InstanceName,

    check_timer: Interval,
    sample_timer: Interval,
    advertise_timer: Interval,

    rx: [u8; MAX_DATAGRAM_LEN],
}

impl<S, N, M, B> Tracker<S, N, M, B>
where
    S: ConfigStore,
    N: NetworkLink + Transport + ServiceAdvertiser,
    M: MotionSensor,
    B: Board,
{
    /// Restores the configuration, brings up the network and opens the service socket.
    ///
    /// On a factory reset request, an erased store or a store read error the factory defaults
    /// are used and written back. Request flags left in the store are cleared, durably. If DHCP
    /// fails the DHCP flag is cleared in the store and [`TrackerError::DhcpFailed`] is returned,
    /// the caller is expected to reset the device.
    ///
    pub fn boot(settings: TrackerSettings, store: S, mut net: N, sensor: M, mut board: B) -> Result<Self, TrackerError> {
        let mut persistence = Persistence::new(store, settings.generation);

        let factory_reset = board.factory_reset_requested();
        let (config, write_back) = match persistence.load() {
            stored if factory_reset => {
                log::warn!("Factory reset requested");
                (factory_defaults_for(&stored.unwrap_or_else(factory_defaults)), true)
            }
            Some(stored) => (stored.durable(), stored.durable() != stored),
            None => (factory_defaults(), true),
        };
        if write_back {
            persistence.save(&config);
        }
        log::info!("Running config: {:?}", config);

        match net.connect(&config) {
            Ok(address) => log::info!("Network up at {}", address),
            Err(e) if config.dhcp() => {
                log::error!("DHCP failed: {:?}", e);
                let mut fallback = config;
                fallback.network_flags.remove(NetworkFlags::DHCP);
                persistence.save(&fallback);
                return Err(TrackerError::DhcpFailed);
            }
            Err(e) => {
                log::error!("Static network setup failed: {:?}", e);
                return Err(TrackerError::LinkFailed);
            }
        }

        if let Err(e) = net.begin(settings.service_port) {
            log::error!("Failed to bind port {}: {:?}", settings.service_port, e);
            return Err(TrackerError::BindFailed(settings.service_port));
        }

        let instance = instance_name(config.device_id());
        if let Err(e) = net.announce(&instance, settings.service_port) {
            log::warn!("Failed to announce {}: {:?}", instance, e);
        }

        let mut indicators = Indicators::default();
        for indicator in Indicator::ALL {
            indicators.set(&mut board, indicator, false);
        }

        Ok(Tracker {
            settings,
            persistence,
            net,
            sensor,
            board,
            session: Session::new(settings.codec(), config),
            link: SensorLink::new(),
            orientation: Orientation::new(),
            indicators,
            instance,
            check_timer: Interval::new(settings.check_period_ms),
            sample_timer: Interval::new(sample_period_ms(config.sampling_freq)),
            advertise_timer: Interval::new(settings.advertise_period_ms),
            rx: [0u8; MAX_DATAGRAM_LEN],
        })
    }

    /// One pass of the main loop: at most one inbound packet, then the connectivity check, then
    /// a sample, then network upkeep. Each step only runs when its interval elapsed.
    ///
    pub fn tick(&mut self, now_ms: u64) -> Control {
        if self.receive() == Control::Reset {
            return self.prepare_reset();
        }

        if self.check_timer.ready(now_ms) {
            self.check_sensor();
        }

        if self.link.status() == ImuStatus::Connected && self.session.config().streaming() {
            self.sample_timer.set_period(sample_period_ms(self.session.config().sampling_freq));
            if self.sample_timer.ready(now_ms) {
                self.sample();
                self.indicators.toggle(&mut self.board, Indicator::Imu);
            }
        }

        self.net.maintain(now_ms);
        if self.advertise_timer.ready(now_ms) {
            if let Err(e) = self.net.announce(&self.instance, self.settings.service_port) {
                log::debug!("Re-announce failed: {:?}", e);
            }
        }

        Control::Continue
    }

    /// Withdraws the service advertisement ahead of a deliberate reset.
    ///
    pub fn prepare_reset(&mut self) -> Control {
        log::info!("Resetting");
        if let Err(e) = self.net.withdraw() {
            log::warn!("Failed to withdraw {}: {:?}", self.instance, e);
        }
        Control::Reset
    }

    pub fn config(&self) -> &DeviceConfig {
        self.session.config()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn imu_status(&self) -> ImuStatus {
        self.link.status()
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn net(&self) -> &N {
        &self.net
    }

    pub fn net_mut(&mut self) -> &mut N {
        &mut self.net
    }

    pub fn sensor_mut(&mut self) -> &mut M {
        &mut self.sensor
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    fn receive(&mut self) -> Control {
        let datagram = match self.net.try_receive(&mut self.rx) {
            Ok(Some(datagram)) => datagram,
            Ok(None) => return Control::Continue,
            Err(e) => {
                log::debug!("Receive failed: {:?}", e);
                return Control::Continue;
            }
        };
        if datagram.len > self.rx.len() {
            log::debug!("Dropping {} byte datagram from {}", datagram.len, datagram.source);
            return Control::Continue;
        }

        self.session.handle(
            &self.rx[..datagram.len],
            datagram.source,
            self.link.status(),
            &mut self.persistence,
            &mut self.net,
        )
    }

    fn check_sensor(&mut self) {
        let status = self.link.check(&mut self.sensor);

        if let Some(changed) = self.link.take_change() {
            self.session.reconcile_status(changed);
            self.session.push_status(&mut self.net);
        }

        self.link.initialize(&mut self.sensor);

        if self.link.status() == ImuStatus::Connected && self.session.take_calibration() {
            if let Err(e) = self.sensor.calibrate() {
                log::warn!("Gyro calibration failed: {:?}", e);
            }
        }

        self.indicators.toggle(&mut self.board, Indicator::Device);
        if !self.session.config().streaming() || status == ImuStatus::Disconnected {
            self.indicators.set(&mut self.board, Indicator::Imu, status != ImuStatus::Disconnected);
        }
    }

    fn sample(&mut self) {
        match self.sensor.interrupt_pending() {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                log::debug!("Interrupt status read failed: {:?}", e);
                return;
            }
        }

        let packet_size = self.link.packet_size();
        match self.sensor.fifo_len() {
            Ok(len) if len >= packet_size => {}
            Ok(_) => return,
            Err(e) => {
                log::debug!("FIFO count read failed: {:?}", e);
                return;
            }
        }

        let raw = match self.sensor.pop_sample(packet_size) {
            Ok(raw) => raw,
            Err(e) => {
                log::debug!("FIFO read failed: {:?}", e);
                return;
            }
        };

        if self.session.take_orientation_reset() {
            self.orientation.reset(&raw);
        }

        let corrected = self.orientation.correct(&raw, self.session.config().status_flags);
        if self.session.send_sample(&mut self.net, &corrected) {
            self.indicators.toggle(&mut self.board, Indicator::Network);
        }
    }
}
