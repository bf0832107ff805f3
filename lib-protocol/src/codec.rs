use crate::*;

/// Largest datagram the device will accept or send.
/// 
pub const MAX_DATAGRAM_LEN: usize = 256;

/// Output buffer for encoded packets.
/// 
pub type PacketBuf = heapless::Vec<u8, MAX_DATAGRAM_LEN>;

pub const LEGACY_MAGIC: u32 = 0x93AD_C7F5;
pub const CONFIG_SYNC_MAGIC: u32 = 0x3F39_E3CC;

pub const MAGIC_LEN: usize = 4;

/// Magic plus message type byte. Nothing shorter than this is a valid packet in either
/// generation.
/// 
pub const HEADER_LEN: usize = MAGIC_LEN + 1;

/// Length of a config sync configuration packet.
/// 
pub const CONFIG_PACKET_LEN: usize = MAGIC_LEN + CONFIG_RECORD_LEN;

/// The two generations of the wire protocol. They share nothing but the magic-first framing, a
/// device speaks exactly one of them.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Generation
{
    /// Typed frames: magic, one type byte, type specific payload.
    Legacy,
    /// Untyped packets: magic followed by either a full [`DeviceConfig`] or a data payload,
    /// told apart by length.
    #[default]
    ConfigSync,
}

impl Generation {
    pub const fn magic(&self) -> u32 {
        match self {
            Self::Legacy => LEGACY_MAGIC,
            Self::ConfigSync => CONFIG_SYNC_MAGIC,
        }
    }
}

/// A legacy frame whose payload is left for the receiver to interpret.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a>
{
    pub kind: MessageType,
    pub payload: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Packet<'a>
{
    /// Legacy control frame.
    Frame(Frame<'a>),
    /// Config sync configuration packet.
    Config(DeviceConfig),
    /// Orientation sample, in either generation.
    Data(DataPacket),
}

/// Encoder and decoder for one protocol generation and sample format.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Codec
{
    pub generation: Generation,
    pub format: SampleFormat,
}

impl Codec
{
    pub const fn new(generation: Generation, format: SampleFormat) -> Self {
        Codec { generation, format }
    }

    /// Total length of a data packet in this codec.
    /// 
    pub const fn data_packet_len(&self) -> usize {
        match self.generation {
            Generation::Legacy => HEADER_LEN + DataPacket::payload_len(self.format),
            Generation::ConfigSync => MAGIC_LEN + DataPacket::payload_len(self.format),
        }
    }

    /// Validates the framing of a datagram and splits it into a packet.
    /// 
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<Packet<'a>, DecodeError> {
        if bytes.len() > MAX_DATAGRAM_LEN {
            return Err(DecodeError::Oversized(bytes.len()));
        }
        if bytes.len() < HEADER_LEN {
            return Err(DecodeError::TooShort(bytes.len()));
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != self.generation.magic() {
            return Err(DecodeError::BadMagic(magic));
        }

        match self.generation {
            Generation::Legacy => {
                let kind = MessageType::try_from(bytes[MAGIC_LEN])?;
                let payload = &bytes[HEADER_LEN..];
                if kind == MessageType::StreamData {
                    return DataPacket::parse_payload(payload, self.format)
                        .map(Packet::Data)
                        .ok_or(DecodeError::Truncated);
                }
                Ok(Packet::Frame(Frame { kind, payload }))
            }
            Generation::ConfigSync => {
                let body = &bytes[MAGIC_LEN..];
                if let Some(config) = DeviceConfig::from_bytes(body) {
                    return Ok(Packet::Config(config));
                }
                DataPacket::parse_payload(body, self.format)
                    .map(Packet::Data)
                    .ok_or(DecodeError::Truncated)
            }
        }
    }

    pub fn encode(&self, packet: &Packet, out: &mut PacketBuf) -> Result<(), EncodeError> {
        match packet {
            Packet::Frame(frame) => self.encode_frame(frame.kind, frame.payload, out),
            Packet::Config(config) => self.encode_config(config, out),
            Packet::Data(data) => self.encode_data(data, out),
        }
    }

    /// Encodes a legacy frame. Not available in the config sync generation.
    /// 
    pub fn encode_frame(&self, kind: MessageType, payload: &[u8], out: &mut PacketBuf) -> Result<(), EncodeError> {
        if self.generation != Generation::Legacy {
            return Err(EncodeError::Unsupported);
        }
        self.write_magic(out)?;
        out.push(kind as u8).map_err(|_| EncodeError::Overflow)?;
        out.extend_from_slice(payload).map_err(|_| EncodeError::Overflow)
    }

    /// Encodes a configuration packet. Only the config sync generation has these.
    /// 
    pub fn encode_config(&self, config: &DeviceConfig, out: &mut PacketBuf) -> Result<(), EncodeError> {
        if self.generation != Generation::ConfigSync {
            return Err(EncodeError::Unsupported);
        }
        self.write_magic(out)?;
        out.extend_from_slice(&config.to_bytes()).map_err(|_| EncodeError::Overflow)
    }

    /// Encodes a data packet. The sample is written in its own format, a sample that does not
    /// match the codec's format would not decode on the other side and is rejected.
    /// 
    pub fn encode_data(&self, data: &DataPacket, out: &mut PacketBuf) -> Result<(), EncodeError> {
        if data.sample.format() != self.format {
            return Err(EncodeError::Unsupported);
        }
        let mut payload = [0u8; DataPacket::payload_len(SampleFormat::Float)];
        let payload = &mut payload[..DataPacket::payload_len(self.format)];
        data.write_payload(payload);

        match self.generation {
            Generation::Legacy => self.encode_frame(MessageType::StreamData, payload, out),
            Generation::ConfigSync => {
                self.write_magic(out)?;
                out.extend_from_slice(payload).map_err(|_| EncodeError::Overflow)
            }
        }
    }

    fn write_magic(&self, out: &mut PacketBuf) -> Result<(), EncodeError> {
        out.clear();
        out.extend_from_slice(&self.generation.magic().to_le_bytes())
            .map_err(|_| EncodeError::Overflow)
    }
}

#[cfg(test)]
mod tests
{
    use core::net::Ipv4Addr;
    use super::*;

    const LEGACY: Codec = Codec::new(Generation::Legacy, SampleFormat::Fixed);
    const SYNC: Codec = Codec::new(Generation::ConfigSync, SampleFormat::Fixed);

    fn config() -> DeviceConfig {
        DeviceConfig {
            device_flags: DeviceFlags::REQUEST_ONLY,
            network_flags: NetworkFlags::empty().with_device_id(3),
            status_flags: StatusFlags::INVERT_Z,
            sampling_freq: 25,
            target_address: Ipv4Addr::new(10, 0, 0, 2),
            target_port: 4000,
            sequence: 9,
            local_address: Ipv4Addr::new(10, 0, 0, 3),
            local_subnet: Ipv4Addr::new(255, 0, 0, 0),
        }
    }

    #[test]
    fn test_legacy_header_layout() {
        let mut out = PacketBuf::new();
        LEGACY.encode_frame(MessageType::AliveRequest, &[1, 2, 3], &mut out).unwrap();
        assert_eq!(&out[..], &[0xF5, 0xC7, 0xAD, 0x93, 5, 1, 2, 3]);
    }

    #[test]
    fn test_config_sync_layout() {
        let mut out = PacketBuf::new();
        SYNC.encode_config(&config(), &mut out).unwrap();
        assert_eq!(out.len(), CONFIG_PACKET_LEN);
        assert_eq!(&out[..4], &[0xCC, 0xE3, 0x39, 0x3F]);
        assert_eq!(&out[4..], &config().to_bytes());
    }

    #[test]
    fn test_short_and_foreign_packets_are_invalid() {
        for len in 0..HEADER_LEN {
            let bytes = [0xF5, 0xC7, 0xAD, 0x93, 5];
            assert_eq!(LEGACY.decode(&bytes[..len]), Err(DecodeError::TooShort(len)));
            assert_eq!(SYNC.decode(&bytes[..len]), Err(DecodeError::TooShort(len)));
        }

        let mut out = PacketBuf::new();
        SYNC.encode_config(&config(), &mut out).unwrap();
        assert_eq!(LEGACY.decode(&out), Err(DecodeError::BadMagic(CONFIG_SYNC_MAGIC)));

        out[0] ^= 0x01;
        assert!(matches!(SYNC.decode(&out), Err(DecodeError::BadMagic(_))));
    }

    #[test]
    fn test_oversized_is_invalid() {
        let mut bytes = [0u8; MAX_DATAGRAM_LEN + 1];
        bytes[..4].copy_from_slice(&LEGACY_MAGIC.to_le_bytes());
        bytes[4] = MessageType::AliveRequest as u8;
        assert_eq!(LEGACY.decode(&bytes), Err(DecodeError::Oversized(MAX_DATAGRAM_LEN + 1)));
        assert!(LEGACY.decode(&bytes[..MAX_DATAGRAM_LEN]).is_ok());
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let bytes = [0xF5, 0xC7, 0xAD, 0x93, 42, 0, 0];
        assert_eq!(LEGACY.decode(&bytes), Err(DecodeError::UnknownType(42)));
    }

    #[test]
    fn test_every_legacy_frame_round_trips() {
        let payload = [192, 168, 0, 10, 255, 255, 255, 0];
        let mut out = PacketBuf::new();

        for kind in MessageType::ALL {
            if kind == MessageType::StreamData {
                continue;
            }
            LEGACY.encode_frame(kind, &payload, &mut out).unwrap();
            assert_eq!(LEGACY.decode(&out), Ok(Packet::Frame(Frame { kind, payload: &payload })));

            LEGACY.encode_frame(kind, &[], &mut out).unwrap();
            assert_eq!(LEGACY.decode(&out), Ok(Packet::Frame(Frame { kind, payload: &[] })));
        }
    }

    #[test]
    fn test_data_round_trips_in_every_variant() {
        let samples = [
            Sample::Fixed([16384, -3, 8000, -16384]),
            Sample::Float([0.70710677, 0.0, -0.70710677, 1.0e-3]),
        ];
        let mut out = PacketBuf::new();

        for generation in [Generation::Legacy, Generation::ConfigSync] {
            for sample in samples {
                let codec = Codec::new(generation, sample.format());
                let data = DataPacket { device_id: 17, sample };

                codec.encode_data(&data, &mut out).unwrap();
                assert_eq!(out.len(), codec.data_packet_len());
                assert_eq!(codec.decode(&out), Ok(Packet::Data(data)));
            }
        }
    }

    #[test]
    fn test_config_round_trips() {
        let mut out = PacketBuf::new();
        SYNC.encode(&Packet::Config(config()), &mut out).unwrap();
        assert_eq!(SYNC.decode(&out), Ok(Packet::Config(config())));
    }

    #[test]
    fn test_config_sync_rejects_odd_lengths() {
        let mut out = PacketBuf::new();
        SYNC.encode_config(&config(), &mut out).unwrap();
        out.truncate(CONFIG_PACKET_LEN - 1);
        assert_eq!(SYNC.decode(&out), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_generation_specific_kinds() {
        let mut out = PacketBuf::new();
        assert_eq!(SYNC.encode_frame(MessageType::Reset, &[], &mut out), Err(EncodeError::Unsupported));
        assert_eq!(LEGACY.encode_config(&config(), &mut out), Err(EncodeError::Unsupported));

        let data = DataPacket { device_id: 0, sample: Sample::Float([1.0, 0.0, 0.0, 0.0]) };
        assert_eq!(LEGACY.encode_data(&data, &mut out), Err(EncodeError::Unsupported));
    }

    #[test]
    fn test_payload_overflow() {
        let payload = [0u8; MAX_DATAGRAM_LEN];
        let mut out = PacketBuf::new();
        assert_eq!(LEGACY.encode_frame(MessageType::AliveResponse, &payload, &mut out), Err(EncodeError::Overflow));
    }
}
