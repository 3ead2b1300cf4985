//! Connectionless datagram transport to the collector.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::debug;

use crate::sink::SinkError;

/// The transport could not be set up; the agent cannot run.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cannot resolve collector address '{address}': {source}")]
    Resolve {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("collector address '{0}' resolved to nothing")]
    NoAddress(String),

    #[error("cannot open UDP socket to {target}: {source}")]
    Socket {
        target: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Sends whole datagrams, unacknowledged.
pub trait Transport {
    fn send(&self, datagram: &[u8]) -> Result<(), SinkError>;
}

/// UDP socket connected to a single collector.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    target: SocketAddr,
}

impl UdpTransport {
    /// Resolves `address` (`host:port`) and connects an ephemeral socket of
    /// the matching address family to the first result.
    pub fn connect(address: &str) -> Result<Self, StartupError> {
        let target = address
            .to_socket_addrs()
            .map_err(|source| StartupError::Resolve {
                address: address.to_string(),
                source,
            })?
            .next()
            .ok_or_else(|| StartupError::NoAddress(address.to_string()))?;

        let bind: SocketAddr = match target {
            SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
            SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
        };

        let socket = UdpSocket::bind(bind)
            .and_then(|socket| socket.connect(target).map(|()| socket))
            .map_err(|source| StartupError::Socket { target, source })?;

        debug!("UDP transport connected to {}", target);
        Ok(Self { socket, target })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Transport for UdpTransport {
    fn send(&self, datagram: &[u8]) -> Result<(), SinkError> {
        let sent = self.socket.send(datagram)?;
        if sent != datagram.len() {
            return Err(SinkError::ShortWrite {
                sent,
                len: datagram.len(),
            });
        }
        Ok(())
    }
}
