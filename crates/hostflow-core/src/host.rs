//! Reporting-host identity.
//!
//! The agent identifies itself to the collector by one IP address, chosen
//! once at startup from the local interfaces and reused for every datagram.

use std::fmt;
use std::io;
use std::net::{IpAddr, Ipv6Addr};

use tracing::{debug, warn};

/// Address reported when no usable interface address exists.
pub const FALLBACK_ADDRESS: IpAddr = IpAddr::V6(Ipv6Addr::LOCALHOST);

/// The address the agent reports as its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostAddress(IpAddr);

impl HostAddress {
    pub fn new(ip: IpAddr) -> Self {
        Self(ip)
    }

    pub fn ip(&self) -> IpAddr {
        self.0
    }

    /// Whether this is the fallback sentinel rather than a real interface address.
    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK_ADDRESS
    }
}

impl From<IpAddr> for HostAddress {
    fn from(ip: IpAddr) -> Self {
        Self(ip)
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A network interface and the IP addresses bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetInterface {
    pub name: String,
    /// Administratively up.
    pub up: bool,
    pub loopback: bool,
    /// Bound addresses in the order the OS reports them.
    pub addresses: Vec<IpAddr>,
}

/// Source of the local interface list.
pub trait InterfaceSource {
    fn interfaces(&self) -> io::Result<Vec<NetInterface>>;
}

/// Interfaces of the running host, via `getifaddrs(3)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemInterfaces;

#[cfg(unix)]
impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> io::Result<Vec<NetInterface>> {
        use nix::net::if_::InterfaceFlags;
        use std::net::{SocketAddrV4, SocketAddrV6};

        let mut interfaces: Vec<NetInterface> = Vec::new();

        for entry in nix::ifaddrs::getifaddrs().map_err(io::Error::from)? {
            let idx = match interfaces
                .iter()
                .position(|iface| iface.name == entry.interface_name)
            {
                Some(idx) => idx,
                None => {
                    interfaces.push(NetInterface {
                        name: entry.interface_name.clone(),
                        up: entry.flags.contains(InterfaceFlags::IFF_UP),
                        loopback: entry.flags.contains(InterfaceFlags::IFF_LOOPBACK),
                        addresses: Vec::new(),
                    });
                    interfaces.len() - 1
                }
            };

            // Link-layer entries carry no IP address.
            let ip = entry.address.as_ref().and_then(|addr| {
                if let Some(sin) = addr.as_sockaddr_in() {
                    Some(IpAddr::V4(*SocketAddrV4::from(*sin).ip()))
                } else {
                    addr.as_sockaddr_in6()
                        .map(|sin6| IpAddr::V6(*SocketAddrV6::from(*sin6).ip()))
                }
            });
            if let Some(ip) = ip {
                interfaces[idx].addresses.push(ip);
            }
        }

        Ok(interfaces)
    }
}

#[cfg(not(unix))]
impl InterfaceSource for SystemInterfaces {
    fn interfaces(&self) -> io::Result<Vec<NetInterface>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "interface enumeration requires getifaddrs",
        ))
    }
}

/// Picks the address that identifies this host.
///
/// Interfaces that are down or loopback are skipped. The first non-loopback
/// address of the first remaining interface that has one wins. Falls back to
/// `::1` when nothing qualifies or enumeration fails.
pub fn resolve_host_address(source: &impl InterfaceSource) -> HostAddress {
    let interfaces = match source.interfaces() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            warn!("Interface enumeration failed: {}", e);
            return HostAddress(FALLBACK_ADDRESS);
        }
    };

    for iface in interfaces.iter().filter(|i| i.up && !i.loopback) {
        if let Some(ip) = iface.addresses.iter().find(|ip| !ip.is_loopback()) {
            debug!("Host address {} taken from interface {}", ip, iface.name);
            return HostAddress(*ip);
        }
    }

    debug!("No usable interface address, using {}", FALLBACK_ADDRESS);
    HostAddress(FALLBACK_ADDRESS)
}
