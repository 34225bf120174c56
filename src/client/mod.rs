//! Object streams: the public face of the client.
//!
//! A [`Client`] holds credentials, timeouts and the transport factory. Each
//! `open` call produces a [`Stream`] that owns one connection for one object
//! transfer. Dropping a stream closes it.
//!
//! ```no_run
//! use std::io::Read;
//! use s3lite::{Client, Credentials};
//!
//! # fn main() -> s3lite::Result<()> {
//! let client = Client::new(Credentials::new("AKID", "secret"));
//! let mut stream = client.get("http://storage.local:9000/bucket/key")?;
//! let mut body = Vec::new();
//! stream.read_to_end(&mut body)?;
//! stream.close()?;
//! # Ok(())
//! # }
//! ```

pub mod url;

use std::io;

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::buffer::DEFAULT_CAPACITY;
use crate::http::{Connection, Mode, Target};
use crate::net::{Connector, TcpConnector, Timeouts};
pub use crate::signing::Credentials;

/// Opens object streams with shared settings.
#[derive(Debug, Clone)]
pub struct Client<C = TcpConnector> {
    connector: C,
    credentials: Credentials,
    timeouts: Timeouts,
    buffer_capacity: usize,
}

impl Client<TcpConnector> {
    /// A client using plain TCP and no timeouts.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_connector(TcpConnector, credentials)
    }

    /// Build a client from loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.credentials()?)
            .timeouts(config.timeouts())
            .buffer_capacity(config.buffer_size))
    }
}

impl<C: Connector + Clone> Client<C> {
    pub fn with_connector(connector: C, credentials: Credentials) -> Self {
        Self {
            connector,
            credentials,
            timeouts: Timeouts::none(),
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Capacity of each stream's receive buffer.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Open a stream to `path` on `host:port`.
    ///
    /// `size` is the number of bytes that will be written; it is ignored in
    /// [`Mode::Reading`].
    pub fn open(&self, host: &str, port: u16, path: &str, mode: Mode, size: u64) -> Result<Stream<C>> {
        if host.is_empty() {
            return Err(Error::InvalidArgument("host must not be empty".into()));
        }
        if !path.starts_with('/') {
            return Err(Error::InvalidArgument(format!("path must start with '/': {path:?}")));
        }
        if mode == Mode::Unopened {
            return Err(Error::InvalidArgument("open mode must be Reading or Writing".into()));
        }

        let mut conn = Connection::with_buffer_capacity(self.connector.clone(), self.buffer_capacity);
        // On failure `conn` is dropped here, which closes it.
        conn.open(
            Target::new(host, port, path),
            &self.credentials,
            mode,
            size,
            self.timeouts,
        )?;
        Ok(Stream { conn })
    }

    /// Open a stream to an `http://` URL.
    pub fn open_url(&self, url: &str, mode: Mode, size: u64) -> Result<Stream<C>> {
        let parts = self::url::parse(url)?;
        if parts.scheme != "http" {
            return Err(Error::InvalidUrl(format!(
                "{url}: unsupported scheme {:?}",
                parts.scheme
            )));
        }
        debug!(host = %parts.host, port = parts.port, path = %parts.path, "Opening URL");
        self.open(&parts.host, parts.port, &parts.path, mode, size)
    }

    /// Open `url` for reading.
    pub fn get(&self, url: &str) -> Result<Stream<C>> {
        self.open_url(url, Mode::Reading, 0)
    }

    /// Open `url` for writing exactly `size` bytes.
    pub fn put(&self, url: &str, size: u64) -> Result<Stream<C>> {
        self.open_url(url, Mode::Writing, size)
    }
}

/// An open object transfer.
#[derive(Debug)]
pub struct Stream<C: Connector = TcpConnector> {
    conn: Connection<C>,
}

impl Stream<TcpConnector> {
    /// Open a stream over TCP in one call.
    pub fn open(
        host: &str,
        port: u16,
        path: &str,
        credentials: Credentials,
        mode: Mode,
        size: u64,
        timeouts: Timeouts,
    ) -> Result<Self> {
        Client::new(credentials)
            .timeouts(timeouts)
            .open(host, port, path, mode, size)
    }

    /// Open a stream to an `http://` URL over TCP in one call.
    pub fn open_url(
        url: &str,
        credentials: Credentials,
        mode: Mode,
        size: u64,
        timeouts: Timeouts,
    ) -> Result<Self> {
        Client::new(credentials)
            .timeouts(timeouts)
            .open_url(url, mode, size)
    }
}

impl<C: Connector> Stream<C> {
    /// Read body bytes; `Ok(0)` once the body is exhausted.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.conn.read(buf)
    }

    /// Write body bytes; never more than announced when opening.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.conn.write(buf)
    }

    /// Close the stream, reporting any error from the transport.
    pub fn close(mut self) -> Result<()> {
        self.conn.close()
    }

    pub fn status_line(&self) -> Result<&str> {
        self.conn.status_line()
    }

    /// A response field by its (case-insensitive) name.
    pub fn response_field(&self, name: &str) -> Result<&str> {
        self.conn.response_field(name)
    }

    pub fn content_length(&self) -> Result<u64> {
        self.conn.content_length()
    }

    pub fn bytes_remaining(&self) -> u64 {
        self.conn.bytes_remaining()
    }

    pub fn mode(&self) -> Mode {
        self.conn.mode()
    }

    pub fn connection(&self) -> &Connection<C> {
        &self.conn
    }
}

impl<C: Connector> io::Read for Stream<C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.conn.read(buf)?)
    }
}

impl<C: Connector> io::Write for Stream<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Cap at what is left so `write_all` sees short writes, not errors.
        let room = usize::try_from(self.conn.bytes_remaining()).unwrap_or(usize::MAX);
        let len = buf.len().min(room);
        if len == 0 && !buf.is_empty() {
            return Ok(0);
        }
        Ok(self.conn.write(&buf[..len])?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
