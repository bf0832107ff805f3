use bitflags::bitflags;

bitflags! {
    /// Requests a host attaches to a configuration packet, and the device's own streaming
    /// state.
    /// 
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceFlags: u8 {
        /// Persist the configuration after applying it.
        const UPDATE = 1 << 0;
        /// Reboot the device once the response has been sent.
        const RESET = 1 << 1;
        /// Stream orientation data to the target address.
        const STREAM_ENABLED = 1 << 2;
        /// Re-estimate the gyroscope bias.
        const CALIBRATE = 1 << 3;
        /// Take the current pose as the new reference orientation.
        const RESET_WORLD = 1 << 4;
        /// Set by the device on unsolicited pushes, i.e. packets that are not a reply.
        const SUPPRESS_RESPONSE = 1 << 6;
        /// Only query the current configuration, apply nothing.
        const REQUEST_ONLY = 1 << 7;
    }
}

impl DeviceFlags {
    /// Flags describing a single request. None of these may survive a reboot, so they are
    /// cleared before anything is written to the persistent store.
    /// 
    pub const TRANSIENT: Self = Self::UPDATE
        .union(Self::RESET)
        .union(Self::STREAM_ENABLED)
        .union(Self::CALIBRATE)
        .union(Self::RESET_WORLD)
        .union(Self::SUPPRESS_RESPONSE)
        .union(Self::REQUEST_ONLY);
}

bitflags! {
    /// Network settings. The upper six bits are not flags but hold the device instance id, use
    /// [`NetworkFlags::device_id`] to read them.
    /// 
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NetworkFlags: u8 {
        const DHCP = 1 << 1;
    }
}

impl NetworkFlags {
    const DEVICE_ID_SHIFT: u8 = 2;

    /// Largest device id that fits in the flag byte.
    pub const MAX_DEVICE_ID: u8 = u8::MAX >> Self::DEVICE_ID_SHIFT;

    /// Device instance id stored in the upper bits.
    /// 
    pub fn device_id(&self) -> u8 {
        self.bits() >> Self::DEVICE_ID_SHIFT
    }

    /// Returns a copy with the device id replaced, ids above [`Self::MAX_DEVICE_ID`] are
    /// truncated.
    /// 
    pub fn with_device_id(&self, id: u8) -> Self {
        let low = self.bits() & ((1 << Self::DEVICE_ID_SHIFT) - 1);
        Self::from_bits_retain(low | (id << Self::DEVICE_ID_SHIFT))
    }
}

bitflags! {
    /// Sensor state and per-axis output options.
    /// 
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// An IMU answers on the bus.
        const IMU_CONNECTED = 1 << 0;
        /// The IMU's DMP is initialized and producing samples.
        const IMU_READY = 1 << 1;
        const INVERT_X = 1 << 2;
        const INVERT_Y = 1 << 3;
        const INVERT_Z = 1 << 4;
        /// Host request to zero the orientation at the current pose.
        const RESET_ORIENTATION = 1 << 5;
    }
}

impl StatusFlags {
    /// Bits the device overwrites from live state, they carry no meaning in the persisted copy.
    /// 
    pub const LIVE: Self = Self::IMU_CONNECTED
        .union(Self::IMU_READY)
        .union(Self::RESET_ORIENTATION);

    pub const INVERT_ALL: Self = Self::INVERT_X
        .union(Self::INVERT_Y)
        .union(Self::INVERT_Z);
}
