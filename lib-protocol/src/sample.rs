use math::Quaternion;

/// Numeric representation of the quaternion components in data packets.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat
{
    /// Q14 fixed point, `1.0` is sent as `16384`.
    #[default]
    Fixed,
    /// IEEE 754 single precision floats.
    Float,
}

impl SampleFormat {
    /// Bytes taken up by the four quaternion components.
    /// 
    pub const fn byte_len(&self) -> usize {
        match self {
            Self::Fixed => 4 * 2,
            Self::Float => 4 * 4,
        }
    }
}

/// Quaternion components in `[w, x, y, z]` order.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample
{
    Fixed([i16; 4]),
    Float([f32; 4]),
}

impl Sample {
    /// Encodes an orientation in the requested format.
    /// 
    pub fn encode(orientation: &Quaternion, format: SampleFormat) -> Self {
        match format {
            SampleFormat::Fixed => Sample::Fixed(orientation.to_q14()),
            SampleFormat::Float => Sample::Float((*orientation).into()),
        }
    }

    pub fn format(&self) -> SampleFormat {
        match self {
            Self::Fixed(_) => SampleFormat::Fixed,
            Self::Float(_) => SampleFormat::Float,
        }
    }

    pub fn to_quaternion(&self) -> Quaternion {
        match self {
            Self::Fixed(values) => Quaternion::from_q14(*values),
            Self::Float(values) => Quaternion::from(*values),
        }
    }

    /// Writes the components into `out`, which must be exactly `self.format().byte_len()` bytes.
    /// 
    fn write(&self, out: &mut [u8]) {
        match self {
            Self::Fixed(values) => {
                for (chunk, value) in out.chunks_exact_mut(2).zip(values) {
                    chunk.copy_from_slice(&value.to_le_bytes());
                }
            }
            Self::Float(values) => {
                for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
                    chunk.copy_from_slice(&value.to_le_bytes());
                }
            }
        }
    }

    fn read(bytes: &[u8], format: SampleFormat) -> Self {
        match format {
            SampleFormat::Fixed => {
                let mut values = [0i16; 4];
                for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(2)) {
                    *value = i16::from_le_bytes([chunk[0], chunk[1]]);
                }
                Sample::Fixed(values)
            }
            SampleFormat::Float => {
                let mut values = [0f32; 4];
                for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
                    *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                }
                Sample::Float(values)
            }
        }
    }
}

/// One orientation sample as streamed to the target address.
/// 
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPacket
{
    pub device_id: u16,
    pub sample: Sample,
}

impl DataPacket {
    /// Length of the payload after the packet header.
    /// 
    pub const fn payload_len(format: SampleFormat) -> usize {
        2 + format.byte_len()
    }

    /// Parses a data payload, which must have exactly the length for `format`.
    /// 
    pub fn parse_payload(payload: &[u8], format: SampleFormat) -> Option<Self> {
        if payload.len() != Self::payload_len(format) {
            return None;
        }
        Some(DataPacket {
            device_id: u16::from_le_bytes([payload[0], payload[1]]),
            sample: Sample::read(&payload[2..], format),
        })
    }

    /// Fills `out` with the payload, `out` must be [`DataPacket::payload_len`] bytes long.
    /// 
    pub(crate) fn write_payload(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.device_id.to_le_bytes());
        self.sample.write(&mut out[2..]);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_fixed_payload_layout() {
        let packet = DataPacket { device_id: 3, sample: Sample::Fixed([16384, -1, 2, -16384]) };
        let mut out = [0u8; DataPacket::payload_len(SampleFormat::Fixed)];
        packet.write_payload(&mut out);

        assert_eq!(out, [3, 0, 0x00, 0x40, 0xFF, 0xFF, 2, 0, 0x00, 0xC0]);
        assert_eq!(DataPacket::parse_payload(&out, SampleFormat::Fixed), Some(packet));
    }

    #[test]
    fn test_payload_length_must_match_format() {
        let packet = DataPacket { device_id: 1, sample: Sample::Float([1.0, 0.0, -0.5, 0.25]) };
        let mut out = [0u8; DataPacket::payload_len(SampleFormat::Float)];
        packet.write_payload(&mut out);

        assert_eq!(DataPacket::parse_payload(&out, SampleFormat::Float), Some(packet));
        assert_eq!(DataPacket::parse_payload(&out, SampleFormat::Fixed), None);
        assert_eq!(DataPacket::parse_payload(&out[..17], SampleFormat::Float), None);
    }

    #[test]
    fn test_encode_keeps_float_bits() {
        let q = Quaternion::new(0.9238795, 0.0, 0.38268343, 0.0);
        let sample = Sample::encode(&q, SampleFormat::Float);
        assert_eq!(sample.to_quaternion(), q);
        assert_eq!(sample.format(), SampleFormat::Float);
    }

    #[test]
    fn test_encode_fixed_point() {
        let q = Quaternion::new(1.0, -0.5, 0.25, 0.0);
        assert_eq!(Sample::encode(&q, SampleFormat::Fixed), Sample::Fixed([16384, -8192, 4096, 0]));
    }
}
