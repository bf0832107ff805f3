//! WiFi station, the UDP service socket and the mDNS announcements, all on top of the esp-wifi
//! smoltcp stack.
//!
use core::net::{Ipv4Addr, SocketAddrV4};

use esp_hal::time;
use esp_wifi::{
    wifi::{ipv4, ClientConfiguration, Configuration, WifiController, WifiStaDevice},
    wifi_interface::{IoError, UdpSocket, WifiStack},
};
use protocol::{mdns::{Announcement, MdnsBuf, DEFAULT_TTL, MDNS_ADDRESS, MDNS_PORT}, DeviceConfig};
use smoltcp::{socket::udp::RecvError, wire::{IpAddress, Ipv4Address}};
use tracker::{Datagram, InstanceName, NetworkLink, ServiceAdvertiser, Transport};

use crate::error::NetError;

const SSID: &str = env!("WIFI_SSID");
const PASSWORD: &str = env!("WIFI_PASSWORD");

/// How long joining the access point may take.
const ASSOCIATE_TIMEOUT_MS: u64 = 20_000;

/// How long the interface may take to get its address, i.e. how long we wait for DHCP.
const ADDRESS_TIMEOUT_MS: u64 = 15_000;

/// Time given to the stack to get queued datagrams out before a reset.
const FLUSH_MS: u64 = 50;

pub type Stack<'a> = WifiStack<'a, WifiStaDevice>;
type Socket<'a> = UdpSocket<'a, 'a, WifiStaDevice>;

fn now_ms() -> u64 {
    time::now().duration_since_epoch().to_millis()
}

fn to_ip(address: Ipv4Addr) -> IpAddress {
    IpAddress::Ipv4(Ipv4Address::from_bytes(&address.octets()))
}

/// Length of the network prefix of a subnet mask, `255.255.255.0` is 24.
///
fn prefix_len(subnet: Ipv4Addr) -> u8 {
    u32::from(subnet).leading_ones() as u8
}

/// Static configurations carry no gateway, the first host of the subnet is assumed.
///
fn assumed_gateway(address: Ipv4Addr, subnet: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from((u32::from(address) & u32::from(subnet)) | 1)
}

/// The network side of the tracker: link, service socket and advertiser in one.
///
pub struct NetStack<'a>
{
    stack: &'a Stack<'a>,
    controller: WifiController<'a>,
    service: Socket<'a>,
    mdns: Socket<'a>,
    address: Option<Ipv4Addr>,

    /// Last announced instance and port, needed for the goodbye.
    announced: Option<(InstanceName, u16)>,
}

impl<'a> NetStack<'a> {
    pub fn new(stack: &'a Stack<'a>, controller: WifiController<'a>, service: Socket<'a>, mdns: Socket<'a>) -> Self {
        NetStack {
            stack,
            controller,
            service,
            mdns,
            address: None,
            announced: None,
        }
    }

    /// Keeps the stack running for a moment so responses queued right before a reset leave the
    /// device.
    ///
    pub fn flush(&mut self) {
        let start = now_ms();
        while now_ms().wrapping_sub(start) < FLUSH_MS {
            self.stack.work();
        }
    }

    fn wait_for(&mut self, timeout_ms: u64, mut done: impl FnMut(&mut Self) -> Result<bool, NetError>) -> Result<(), NetError> {
        let start = now_ms();
        while !done(self)? {
            if now_ms().wrapping_sub(start) > timeout_ms {
                return Err(NetError::Timeout);
            }
            self.stack.work();
        }
        Ok(())
    }

    fn send_announcement(&mut self, instance: &str, port: u16, ttl: u32) -> Result<(), NetError> {
        let address = self.address.ok_or(NetError::NoAddress)?;
        let mut out = MdnsBuf::new();
        Announcement { instance, address, port, ttl }.encode(&mut out)?;
        self.mdns.send(to_ip(MDNS_ADDRESS), MDNS_PORT, &out)?;
        Ok(())
    }
}

impl NetworkLink for NetStack<'_> {
    type Error = NetError;

    /// Joins the access point and waits for an address, from DHCP or from `config`. Blocks, this
    /// only runs during boot.
    ///
    fn connect(&mut self, config: &DeviceConfig) -> Result<Ipv4Addr, Self::Error> {
        if !config.dhcp() {
            log::info!("Using static address {}/{}", config.local_address, config.local_subnet);
            self.stack.set_iface_configuration(&ipv4::Configuration::Client(
                ipv4::ClientConfiguration::Fixed(ipv4::ClientSettings {
                    ip: config.local_address,
                    subnet: ipv4::Subnet {
                        gateway: assumed_gateway(config.local_address, config.local_subnet),
                        mask: ipv4::Mask(prefix_len(config.local_subnet)),
                    },
                    dns: None,
                    secondary_dns: None,
                }),
            ))?;
        }

        let client = ClientConfiguration {
            ssid: SSID.try_into().map_err(|_| NetError::Credentials)?,
            password: PASSWORD.try_into().map_err(|_| NetError::Credentials)?,
            ..Default::default()
        };
        self.controller.set_configuration(&Configuration::Client(client))?;
        self.controller.start()?;
        log::debug!("Connecting to {}", SSID);
        self.controller.connect()?;

        self.wait_for(ASSOCIATE_TIMEOUT_MS, |net| Ok(net.controller.is_connected()?))?;
        log::info!("Associated with {}", SSID);

        self.wait_for(ADDRESS_TIMEOUT_MS, |net| Ok(net.stack.is_iface_up()))?;
        let address = self.stack.get_ip_info()?.ip;
        self.address = Some(address);
        Ok(address)
    }

    fn maintain(&mut self, _now_ms: u64) {
        self.stack.work();
    }
}

impl Transport for NetStack<'_> {
    type Error = NetError;

    fn begin(&mut self, local_port: u16) -> Result<(), Self::Error> {
        self.service.bind(local_port)?;
        self.mdns.bind(MDNS_PORT)?;
        Ok(())
    }

    fn send(&mut self, destination: SocketAddrV4, bytes: &[u8]) -> Result<(), Self::Error> {
        self.service.send(to_ip(*destination.ip()), destination.port(), bytes)?;
        Ok(())
    }

    fn try_receive(&mut self, buf: &mut [u8]) -> Result<Option<Datagram>, Self::Error> {
        match self.service.receive(buf) {
            Ok((len, IpAddress::Ipv4(address), port)) => Ok(Some(Datagram {
                len,
                source: SocketAddrV4::new(Ipv4Addr::from(address.0), port),
            })),
            Err(IoError::UdpRecvError(RecvError::Exhausted)) => Ok(None),
            Err(IoError::UdpRecvError(RecvError::Truncated)) => {
                log::debug!("Dropping datagram larger than {} bytes", buf.len());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ServiceAdvertiser for NetStack<'_> {
    type Error = NetError;

    fn announce(&mut self, instance: &str, port: u16) -> Result<(), Self::Error> {
        self.send_announcement(instance, port, DEFAULT_TTL)?;
        let mut name = InstanceName::new();
        // Instance names come from `InstanceName`, they always fit.
        let _ = name.push_str(instance);
        self.announced = Some((name, port));
        log::debug!("Announced {} on port {}", instance, port);
        Ok(())
    }

    fn withdraw(&mut self) -> Result<(), Self::Error> {
        let Some((name, port)) = self.announced.take() else {
            return Ok(());
        };
        self.send_announcement(&name, port, 0)?;
        self.stack.work();
        Ok(())
    }
}
