use core::net::Ipv4Addr;
use crate::*;

/// Type byte of a legacy frame, directly following the magic.
/// 
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType
{
    Error = 0,
    Reset = 1,
    SetStartupAddress = 2,
    SetDhcpEnabled = 3,
    StartupAddressConfirm = 4,
    AliveRequest = 5,
    AliveResponse = 6,
    StreamData = 7,
    StreamEnable = 8,
    StreamEnableResponse = 9,
    StreamDisable = 10,
    StreamDisableResponse = 11,
}

impl MessageType {
    pub const ALL: [MessageType; 12] = [
        MessageType::Error,
        MessageType::Reset,
        MessageType::SetStartupAddress,
        MessageType::SetDhcpEnabled,
        MessageType::StartupAddressConfirm,
        MessageType::AliveRequest,
        MessageType::AliveResponse,
        MessageType::StreamData,
        MessageType::StreamEnable,
        MessageType::StreamEnableResponse,
        MessageType::StreamDisable,
        MessageType::StreamDisableResponse,
    ];
}

impl TryFrom<u8> for MessageType {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, DecodeError> {
        MessageType::ALL
            .get(value as usize)
            .copied()
            .ok_or(DecodeError::UnknownType(value))
    }
}

/// Payload of `SetStartupAddress` and `StartupAddressConfirm`.
/// 
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupAddress
{
    pub address: Ipv4Addr,
    pub subnet: Ipv4Addr,
}

impl StartupAddress {
    pub const LEN: usize = 8;

    /// Returns `None` when the payload is too short to hold both addresses.
    /// 
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < Self::LEN {
            return None;
        }
        Some(StartupAddress {
            address: read_addr(&payload[0..4]),
            subnet: read_addr(&payload[4..8]),
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut bytes = [0u8; Self::LEN];
        bytes[0..4].copy_from_slice(&self.address.octets());
        bytes[4..8].copy_from_slice(&self.subnet.octets());
        bytes
    }
}

/// Payload of `SetDhcpEnabled`: a single byte, anything but zero enables DHCP.
/// 
pub fn parse_dhcp_enabled(payload: &[u8]) -> Option<bool> {
    payload.first().map(|b| *b != 0)
}
