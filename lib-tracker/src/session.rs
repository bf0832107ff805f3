use core::net::SocketAddrV4;

use math::Quaternion;
use protocol::*;

use crate::{ConfigStore, ImuStatus, Persistence, Transport};

/// What the caller has to do after handing the session a packet.
///
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    /// Any response has been sent, the device should reset now.
    Reset,
}

/// Owner of the running configuration. Applies control packets from the host, answers them and
/// decides what reaches the persistent store.
///
pub struct Session {
    codec: Codec,
    config: DeviceConfig,

    /// Origin of the most recent control packet, not necessarily the stream target.
    sender: Option<SocketAddrV4>,

    orientation_reset: bool,
    calibration: bool,
}

impl Session {
    pub fn new(codec: Codec, config: DeviceConfig) -> Self {
        Session {
            codec,
            config,
            sender: None,
            orientation_reset: false,
            calibration: false,
        }
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn sender(&self) -> Option<SocketAddrV4> {
        self.sender
    }

    /// Mirrors the IMU status into the status flags and turns one shot requests carried in the
    /// flags (orientation reset, gyro calibration) into pending work.
    ///
    pub fn reconcile_status(&mut self, status: ImuStatus) {
        let flags = &mut self.config.status_flags;
        flags.set(StatusFlags::IMU_CONNECTED, status != ImuStatus::Disconnected);
        flags.set(StatusFlags::IMU_READY, status == ImuStatus::Connected);

        if flags.contains(StatusFlags::RESET_ORIENTATION) {
            flags.remove(StatusFlags::RESET_ORIENTATION);
            self.orientation_reset = true;
        }

        let device = &mut self.config.device_flags;
        if device.contains(DeviceFlags::RESET_WORLD) {
            device.remove(DeviceFlags::RESET_WORLD);
            self.orientation_reset = true;
        }
        if device.contains(DeviceFlags::CALIBRATE) {
            device.remove(DeviceFlags::CALIBRATE);
            self.calibration = true;
        }
    }

    /// Whether an orientation reset is pending, clears the request.
    ///
    pub fn take_orientation_reset(&mut self) -> bool {
        core::mem::take(&mut self.orientation_reset)
    }

    /// Whether a gyro calibration is pending, clears the request.
    ///
    pub fn take_calibration(&mut self) -> bool {
        core::mem::take(&mut self.calibration)
    }

    /// Handles one received datagram. Anything that does not decode is dropped without an
    /// answer.
    ///
    pub fn handle<S, T>(
        &mut self,
        bytes: &[u8],
        source: SocketAddrV4,
        status: ImuStatus,
        store: &mut Persistence<S>,
        transport: &mut T,
    ) -> Control
    where
        S: ConfigStore,
        T: Transport,
    {
        let packet = match self.codec.decode(bytes) {
            Ok(packet) => packet,
            Err(e) => {
                log::debug!("Dropping packet from {}: {}", source, e);
                return Control::Continue;
            }
        };

        match packet {
            Packet::Config(proposed) => self.on_config(proposed, source, status, store, transport),
            Packet::Frame(frame) => self.on_frame(frame, source, store, transport),
            Packet::Data(_) => {
                log::debug!("Ignoring data packet from {}", source);
                Control::Continue
            }
        }
    }

    fn on_config<S: ConfigStore, T: Transport>(
        &mut self,
        proposed: DeviceConfig,
        source: SocketAddrV4,
        status: ImuStatus,
        store: &mut Persistence<S>,
        transport: &mut T,
    ) -> Control {
        self.sender = Some(source);

        if proposed.device_flags.contains(DeviceFlags::REQUEST_ONLY) {
            log::debug!("Config request from {}", source);
            self.respond(transport);
            return Control::Continue;
        }

        log::info!("Config from {}: {:?}", source, proposed);
        self.config = proposed;
        self.reconcile_status(status);

        if proposed.device_flags.contains(DeviceFlags::UPDATE) {
            store.save(&self.config);
        }

        self.respond(transport);

        if proposed.device_flags.contains(DeviceFlags::RESET) {
            Control::Reset
        } else {
            Control::Continue
        }
    }

    fn on_frame<S: ConfigStore, T: Transport>(
        &mut self,
        frame: Frame,
        source: SocketAddrV4,
        store: &mut Persistence<S>,
        transport: &mut T,
    ) -> Control {
        self.sender = Some(source);

        match frame.kind {
            MessageType::AliveRequest => {
                self.reply(transport, source, MessageType::AliveResponse, frame.payload);
            }
            MessageType::SetDhcpEnabled => match parse_dhcp_enabled(frame.payload) {
                Some(enabled) => {
                    log::info!("DHCP enabled={} from next boot", enabled);
                    store.persist_dhcp(enabled);
                }
                None => log::debug!("Empty DHCP request from {}", source),
            },
            MessageType::SetStartupAddress => match StartupAddress::parse(frame.payload) {
                Some(startup) => {
                    log::info!("Startup address {}/{}", startup.address, startup.subnet);
                    store.persist_startup_address(&startup);
                    let confirmed = store.startup_address().unwrap_or(startup);
                    self.reply(transport, source, MessageType::StartupAddressConfirm, &confirmed.to_bytes());
                }
                None => log::debug!("Short startup address from {}", source),
            },
            MessageType::StreamEnable => {
                log::info!("Streaming to {}", source);
                self.config.set_target(source);
                self.config.device_flags.insert(DeviceFlags::STREAM_ENABLED);
                self.reply(transport, source, MessageType::StreamEnableResponse, &[]);
            }
            MessageType::StreamDisable => {
                log::info!("Streaming stopped");
                self.config.device_flags.remove(DeviceFlags::STREAM_ENABLED);
                self.reply(transport, source, MessageType::StreamDisableResponse, &[]);
            }
            MessageType::Reset => {
                log::info!("Reset requested by {}", source);
                return Control::Reset;
            }
            other => log::debug!("Ignoring {:?} from {}", other, source),
        }

        Control::Continue
    }

    /// Pushes the full configuration to the last sender without being asked. The packet is
    /// marked with `SUPPRESS_RESPONSE` so the host does not treat it as an answer.
    ///
    pub fn push_status<T: Transport>(&mut self, transport: &mut T) {
        if self.sender.is_none() || self.codec.generation != Generation::ConfigSync {
            return;
        }
        self.config.device_flags.insert(DeviceFlags::SUPPRESS_RESPONSE);
        self.respond(transport);
    }

    /// Sends one orientation sample to the stream target, returns whether it went out.
    ///
    pub fn send_sample<T: Transport>(&self, transport: &mut T, orientation: &Quaternion) -> bool {
        let packet = DataPacket {
            device_id: self.config.device_id(),
            sample: Sample::encode(orientation, self.codec.format),
        };
        let mut out = PacketBuf::new();
        if let Err(e) = self.codec.encode_data(&packet, &mut out) {
            log::warn!("Failed to encode sample: {}", e);
            return false;
        }
        send(transport, self.config.target(), &out)
    }

    /// Answers the last sender with the running configuration.
    fn respond<T: Transport>(&mut self, transport: &mut T) {
        if let Some(destination) = self.sender {
            let mut out = PacketBuf::new();
            match self.codec.encode_config(&self.config, &mut out) {
                Ok(()) => {
                    send(transport, destination, &out);
                }
                Err(e) => log::warn!("Failed to encode config: {}", e),
            }
        }
        self.config.device_flags.remove(DeviceFlags::SUPPRESS_RESPONSE);
    }

    fn reply<T: Transport>(&self, transport: &mut T, destination: SocketAddrV4, kind: MessageType, payload: &[u8]) {
        let mut out = PacketBuf::new();
        match self.codec.encode_frame(kind, payload, &mut out) {
            Ok(()) => {
                send(transport, destination, &out);
            }
            Err(e) => log::warn!("Failed to encode {:?}: {}", kind, e),
        }
    }
}

fn send<T: Transport>(transport: &mut T, destination: SocketAddrV4, bytes: &[u8]) -> bool {
    match transport.send(destination, bytes) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Send to {} failed: {:?}", destination, e);
            false
        }
    }
}
