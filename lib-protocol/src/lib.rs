//! Wire format of the head tracker: the device configuration record, the flag sets carried in
//! it, the two packet generations (legacy typed frames and config sync packets) and the mDNS
//! announcement the device uses to make itself discoverable.
//! 
//! Every multi-byte integer on the wire is little-endian, IPv4 addresses are sent as their four
//! octets in dotted order.
//! 
#![cfg_attr(not(test), no_std)]

pub mod error;
pub use error::*;

pub mod flags;
pub use flags::*;

pub mod config;
pub use config::*;

pub mod message;
pub use message::*;

pub mod sample;
pub use sample::*;

pub mod codec;
pub use codec::*;

pub mod mdns;

/// UDP port the device listens on for control packets.
/// 
pub const SERVICE_PORT: u16 = 11023;
