//! Unsolicited mDNS announcements (RFC 6762 section 8.3) advertising the tracker's control port.
//! The device never answers queries, it announces on boot and periodically afterwards, and sends
//! a goodbye (TTL 0) before it reboots.
//! 
use core::net::Ipv4Addr;
use crate::EncodeError;

pub const MDNS_ADDRESS: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_PORT: u16 = 5353;

/// DNS-SD service type the tracker registers under.
/// 
pub const SERVICE_TYPE: &str = "_htrk._udp.local";

/// TTL used for regular announcements, in seconds.
/// 
pub const DEFAULT_TTL: u32 = 120;

pub type MdnsBuf = heapless::Vec<u8, 512>;

const TYPE_A: u16 = 1;
const TYPE_PTR: u16 = 12;
const TYPE_TXT: u16 = 16;
const TYPE_SRV: u16 = 33;

const CLASS_IN: u16 = 1;
const CLASS_IN_FLUSH: u16 = 0x8001;

/// Response, authoritative answer.
const FLAGS_RESPONSE: u16 = 0x8400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Announcement<'a>
{
    /// Instance name, e.g. `htrk_07`. Also used as the host name.
    pub instance: &'a str,
    pub address: Ipv4Addr,
    pub port: u16,
    /// Seconds the records stay valid, 0 withdraws them.
    pub ttl: u32,
}

impl<'a> Announcement<'a>
{
    /// Encodes the PTR, SRV, TXT and A records into one response message.
    /// 
    pub fn encode(&self, out: &mut MdnsBuf) -> Result<(), EncodeError> {
        out.clear();

        // Header: id, flags, 0 questions, 4 answers, 0 authority, 0 additional.
        for word in [0, FLAGS_RESPONSE, 0, 4, 0, 0] {
            put_u16(out, word)?;
        }

        // _htrk._udp.local PTR htrk_07._htrk._udp.local
        write_name(out, &[SERVICE_TYPE])?;
        self.record_header(out, TYPE_PTR, CLASS_IN)?;
        let rdata = RData::begin(out)?;
        write_name(out, &[self.instance, SERVICE_TYPE])?;
        rdata.finish(out)?;

        // htrk_07._htrk._udp.local SRV 0 0 port htrk_07.local
        write_name(out, &[self.instance, SERVICE_TYPE])?;
        self.record_header(out, TYPE_SRV, CLASS_IN_FLUSH)?;
        let rdata = RData::begin(out)?;
        put_u16(out, 0)?;
        put_u16(out, 0)?;
        put_u16(out, self.port)?;
        write_name(out, &[self.instance, "local"])?;
        rdata.finish(out)?;

        // htrk_07._htrk._udp.local TXT "" (DNS-SD requires a TXT record, even an empty one)
        write_name(out, &[self.instance, SERVICE_TYPE])?;
        self.record_header(out, TYPE_TXT, CLASS_IN_FLUSH)?;
        let rdata = RData::begin(out)?;
        put(out, &[0])?;
        rdata.finish(out)?;

        // htrk_07.local A address
        write_name(out, &[self.instance, "local"])?;
        self.record_header(out, TYPE_A, CLASS_IN_FLUSH)?;
        let rdata = RData::begin(out)?;
        put(out, &self.address.octets())?;
        rdata.finish(out)
    }

    fn record_header(&self, out: &mut MdnsBuf, kind: u16, class: u16) -> Result<(), EncodeError> {
        put_u16(out, kind)?;
        put_u16(out, class)?;
        put(out, &self.ttl.to_be_bytes())
    }
}

/// Placeholder for a record's data length, patched once the data is written.
struct RData(usize);

impl RData {
    fn begin(out: &mut MdnsBuf) -> Result<Self, EncodeError> {
        let at = out.len();
        put_u16(out, 0)?;
        Ok(RData(at))
    }

    fn finish(self, out: &mut MdnsBuf) -> Result<(), EncodeError> {
        let len = u16::try_from(out.len() - self.0 - 2).map_err(|_| EncodeError::Overflow)?;
        out[self.0..self.0 + 2].copy_from_slice(&len.to_be_bytes());
        Ok(())
    }
}

/// Writes the concatenation of the dotted `parts` as one uncompressed DNS name.
/// 
fn write_name(out: &mut MdnsBuf, parts: &[&str]) -> Result<(), EncodeError> {
    for part in parts {
        for label in part.split('.') {
            if label.is_empty() || label.len() > 63 {
                return Err(EncodeError::InvalidName);
            }
            put(out, &[label.len() as u8])?;
            put(out, label.as_bytes())?;
        }
    }
    put(out, &[0])
}

#[inline]
fn put(out: &mut MdnsBuf, bytes: &[u8]) -> Result<(), EncodeError> {
    out.extend_from_slice(bytes).map_err(|_| EncodeError::Overflow)
}

#[inline]
fn put_u16(out: &mut MdnsBuf, value: u16) -> Result<(), EncodeError> {
    put(out, &value.to_be_bytes())
}
