use math::Quaternion;

/// Size of a MotionApps 2.0 FIFO packet: quaternion, gyro and accel words plus a trailer.
/// 
pub const DMP_PACKET_SIZE: u16 = 42;

/// Bytes at the start of a packet that hold the quaternion.
/// 
pub const DMP_QUATERNION_LEN: usize = 16;

/// Orientation part of one DMP FIFO packet.
/// 
/// The DMP writes each quaternion component as a big endian 32 bit word whose upper half is a
/// Q14 fixed point value, the same resolution the tracker puts on the wire.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmpPacket {
    pub quaternion: [i16; 4],
}

impl DmpPacket {

    pub fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < DMP_QUATERNION_LEN {
            return None;
        }
        let mut quaternion = [0i16; 4];
        for (i, component) in quaternion.iter_mut().enumerate() {
            *component = i16::from_be_bytes([bytes[i * 4], bytes[i * 4 + 1]]);
        }
        Some(DmpPacket { quaternion })
    }

    /// Orientation as a float quaternion, `w` first.
    /// 
    pub fn orientation(&self) -> Quaternion {
        Quaternion::from_q14(self.quaternion)
    }
}
