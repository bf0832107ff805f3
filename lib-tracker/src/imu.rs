use crate::MotionSensor;

/// Connection state of the IMU, advanced by [`SensorLink::check`].
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImuStatus {
    /// Probe failed or returned the wrong identity.
    #[default]
    Disconnected,
    /// Answered the probe, motion processor not running yet.
    Found,
    /// Motion processor running, samples can be popped.
    Connected,
}

/// Tracks the IMU through `Disconnected -> Found -> Connected` and remembers the last status
/// that was reported to the host.
/// 
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorLink {
    status: ImuStatus,
    reported: ImuStatus,
    packet_size: u16,
}

impl SensorLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ImuStatus {
        self.status
    }

    /// FIFO packet size reported by the last successful initialization.
    /// 
    pub fn packet_size(&self) -> u16 {
        self.packet_size
    }

    /// Probes the sensor. A bus error or a wrong identity drops the link to `Disconnected`
    /// from any state, a good answer while disconnected moves it to `Found`.
    /// 
    pub fn check<M: MotionSensor>(&mut self, sensor: &mut M) -> ImuStatus {
        let present = match sensor.probe() {
            Ok(present) => present,
            Err(e) => {
                log::debug!("IMU probe failed: {:?}", e);
                false
            }
        };

        self.status = match (present, self.status) {
            (false, ImuStatus::Disconnected) => ImuStatus::Disconnected,
            (false, _) => {
                log::warn!("IMU lost");
                ImuStatus::Disconnected
            }
            (true, ImuStatus::Disconnected) => {
                log::info!("IMU found");
                ImuStatus::Found
            }
            (true, status) => status,
        };
        self.status
    }

    /// Returns the current status if it differs from the one last returned here.
    /// 
    pub fn take_change(&mut self) -> Option<ImuStatus> {
        if self.status == self.reported {
            return None;
        }
        self.reported = self.status;
        Some(self.status)
    }

    /// Starts the motion processor of a `Found` sensor. Failure keeps the link at `Found` so the
    /// next check tries again.
    /// 
    pub fn initialize<M: MotionSensor>(&mut self, sensor: &mut M) {
        if self.status != ImuStatus::Found {
            return;
        }
        match sensor.initialize() {
            Ok(packet_size) => {
                log::info!("IMU ready, {} byte packets", packet_size);
                self.packet_size = packet_size;
                self.status = ImuStatus::Connected;
            }
            Err(e) => log::warn!("IMU initialization failed: {:?}", e),
        }
    }
}
