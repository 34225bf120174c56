//! Blocking TCP transport on top of `std::net`.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use tracing::{debug, trace};

use super::{Connector, Timeouts, Transport};
use crate::error::{Error, Result};

/// Opens plain TCP connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Transport = TcpTransport;

    fn connect(&self, host: &str, port: u16, timeouts: Timeouts) -> Result<TcpTransport> {
        TcpTransport::connect(host, port, timeouts)
    }
}

/// A connected TCP stream.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Resolve `host` and connect to the first address that accepts.
    pub fn connect(host: &str, port: u16, timeouts: Timeouts) -> Result<Self> {
        let addrs: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|e| Error::NoHost(format!("{host}: {e}")))?
            .collect();

        if addrs.is_empty() {
            return Err(Error::NoHost(host.to_string()));
        }

        let mut last_error = None;
        for addr in addrs {
            let attempt = match timeouts.connect {
                Some(limit) => TcpStream::connect_timeout(&addr, limit),
                None => TcpStream::connect(addr),
            };

            match attempt {
                Ok(stream) => {
                    stream.set_read_timeout(timeouts.socket)?;
                    stream.set_write_timeout(timeouts.socket)?;
                    stream.set_nodelay(true)?;
                    debug!(host, port, peer = %addr, "Connected");
                    return Ok(Self { stream });
                }
                Err(e) => {
                    trace!(peer = %addr, error = %e, "Connect attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .map(Error::from)
            .unwrap_or_else(|| Error::NoHost(host.to_string())))
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, buf: &[u8]) -> Result<usize> {
        loop {
            match self.stream.write(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return Ok(other?),
            }
        }
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.stream.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return Ok(other?),
            }
        }
    }

    fn disconnect(&mut self) -> Result<()> {
        match self.stream.shutdown(Shutdown::Both) {
            // The peer may already have torn the connection down.
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => Ok(other?),
        }
    }
}
