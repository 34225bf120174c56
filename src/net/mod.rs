//! Byte-stream transport used by the connection engine.
//!
//! The engine never touches sockets directly. It asks a [`Connector`] for a
//! [`Transport`] and then only calls `send`, `recv` and `disconnect` on it,
//! which keeps the protocol logic testable against scripted in-memory
//! streams.

pub mod tcp;

use std::time::Duration;

use crate::error::Result;

pub use tcp::{TcpConnector, TcpTransport};

/// Connect and socket timeouts. `None` waits forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    /// Upper bound for establishing the connection.
    pub connect: Option<Duration>,
    /// Upper bound for each individual send or receive.
    pub socket: Option<Duration>,
}

impl Timeouts {
    pub fn new(connect: Option<Duration>, socket: Option<Duration>) -> Self {
        Self { connect, socket }
    }

    /// Build from microsecond values where `0` means "no timeout".
    pub fn from_micros(connect_us: u64, socket_us: u64) -> Self {
        Self {
            connect: non_zero_micros(connect_us),
            socket: non_zero_micros(socket_us),
        }
    }

    /// No timeouts at all.
    pub fn none() -> Self {
        Self::default()
    }
}

fn non_zero_micros(us: u64) -> Option<Duration> {
    (us > 0).then(|| Duration::from_micros(us))
}

/// An established, bidirectional byte stream.
pub trait Transport {
    /// Send up to `buf.len()` bytes, returning how many were accepted.
    fn send(&mut self, buf: &[u8]) -> Result<usize>;

    /// Receive up to `buf.len()` bytes. `Ok(0)` means the peer closed the
    /// stream.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Tear the stream down. Called exactly once per transport.
    fn disconnect(&mut self) -> Result<()>;

    /// Send the whole of `buf`, looping over short sends.
    fn send_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            let n = self.send(buf)?;
            if n == 0 {
                return Err(crate::Error::ConnectionReset);
            }
            buf = &buf[n..];
        }
        Ok(())
    }
}

/// Factory for transports.
pub trait Connector {
    type Transport: Transport;

    /// Establish a stream to `host:port`.
    fn connect(&self, host: &str, port: u16, timeouts: Timeouts) -> Result<Self::Transport>;
}

impl<C: Connector + ?Sized> Connector for &C {
    type Transport = C::Transport;

    fn connect(&self, host: &str, port: u16, timeouts: Timeouts) -> Result<Self::Transport> {
        (**self).connect(host, port, timeouts)
    }
}
