use core::{error::Error, fmt};

/// Reasons a datagram is not a packet we understand. The device drops these silently, the
/// variants only exist so the reason can be logged.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError
{
    /// Fewer bytes than the smallest valid packet.
    TooShort(usize),
    /// The first four bytes are not the magic of the configured generation.
    BadMagic(u32),
    /// Larger than the biggest datagram we accept.
    Oversized(usize),
    /// Legacy frame with a message type byte we do not know.
    UnknownType(u8),
    /// Known framing, but the payload is incomplete.
    Truncated,
}

impl Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TooShort(len) => write!(f, "packet too short ({} bytes)", len),
            Self::BadMagic(magic) => write!(f, "bad magic {:#010x}", magic),
            Self::Oversized(len) => write!(f, "packet too large ({} bytes)", len),
            Self::UnknownType(kind) => write!(f, "unknown message type {}", kind),
            Self::Truncated => write!(f, "truncated payload"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError
{
    /// The output buffer cannot hold the packet.
    Overflow,
    /// The packet kind does not exist in the configured generation.
    Unsupported,
    /// A DNS label was empty or longer than 63 bytes.
    InvalidName,
}

impl Error for EncodeError {}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "packet does not fit the output buffer"),
            Self::Unsupported => write!(f, "packet kind not supported by this protocol generation"),
            Self::InvalidName => write!(f, "invalid DNS name"),
        }
    }
}
