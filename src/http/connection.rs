use std::time::SystemTime;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::http::buffer::ReceiveBuffer;
use crate::http::parser::HeadParser;
use crate::http::request::{Method, RequestBuilder};
use crate::http::response::ResponseHead;
use crate::net::{Connector, TcpConnector, Timeouts, Transport};
use crate::signing::Credentials;

/// Where a connection goes: host, port and the object path.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

impl<'a> Target<'a> {
    pub fn new(host: &'a str, port: u16, path: &'a str) -> Self {
        Self { host, port, path }
    }
}

/// Lifecycle state of a [`Connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Not connected. Initial and terminal state.
    Unopened,
    /// GET: the response head was parsed during `open`, the body is read.
    Reading,
    /// PUT: the body is written, the response head is parsed afterwards.
    Writing,
}

impl Mode {
    fn method(self) -> Option<Method> {
        match self {
            Mode::Reading => Some(Method::GET),
            Mode::Writing => Some(Method::PUT),
            Mode::Unopened => None,
        }
    }
}

/// One signed request/response exchange over an owned transport.
///
/// ```text
///   Unopened ──open(Reading)──▶ Reading ──close──▶ Unopened
///       │                                            ▲
///       └──────open(Writing)──▶ Writing ──close──────┘
/// ```
///
/// All calls block. A connection is used by one caller at a time.
pub struct Connection<C: Connector = TcpConnector> {
    connector: C,
    transport: Option<C::Transport>,
    mode: Mode,
    buffer: ReceiveBuffer,
    parser: HeadParser,
    response: ResponseHead,
    response_received: bool,
    content_length: u64,
    bytes_remaining: u64,
    has_content_length: bool,
    is_chunked: bool,
    /// Transport failure hit after some bytes were already handed out.
    deferred_error: Option<Error>,
}

impl Connection<TcpConnector> {
    pub fn new() -> Self {
        Self::with_connector(TcpConnector)
    }
}

impl Default for Connection<TcpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Connection<C> {
    pub fn with_connector(connector: C) -> Self {
        Self::with_buffer_capacity(connector, crate::http::buffer::DEFAULT_CAPACITY)
    }

    /// Use a receive buffer of `capacity` bytes.
    pub fn with_buffer_capacity(connector: C, capacity: usize) -> Self {
        Self {
            connector,
            transport: None,
            mode: Mode::Unopened,
            buffer: ReceiveBuffer::with_capacity(capacity),
            parser: HeadParser::new(),
            response: ResponseHead::default(),
            response_received: false,
            content_length: 0,
            bytes_remaining: 0,
            has_content_length: false,
            is_chunked: false,
            deferred_error: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode != Mode::Unopened
    }

    /// `true` once the whole response header block has been parsed.
    pub fn response_received(&self) -> bool {
        self.response_received
    }

    /// Body bytes still to be read or written.
    pub fn bytes_remaining(&self) -> u64 {
        self.bytes_remaining
    }

    pub fn transport(&self) -> Option<&C::Transport> {
        self.transport.as_ref()
    }

    /// Connect, send the signed request head and, when reading, parse the
    /// response head.
    ///
    /// `size` is the body length announced for [`Mode::Writing`]; `0` asks
    /// for chunked framing, which is not supported, so every later
    /// `read`/`write` fails with [`Error::Unsupported`].
    ///
    /// If anything fails after the transport is up (including a 403 or 404
    /// response), the connection stays open so the response can be
    /// inspected; it must still be closed.
    pub fn open(
        &mut self,
        target: Target<'_>,
        credentials: &Credentials,
        mode: Mode,
        size: u64,
        timeouts: Timeouts,
    ) -> Result<()> {
        self.open_at(target, credentials, mode, size, timeouts, SystemTime::now())
    }

    /// [`open`](Self::open) with an explicit request timestamp.
    pub fn open_at(
        &mut self,
        target: Target<'_>,
        credentials: &Credentials,
        mode: Mode,
        size: u64,
        timeouts: Timeouts,
        now: SystemTime,
    ) -> Result<()> {
        if target.port == 0 {
            return Err(Error::InvalidOperation("port must be between 1 and 65535"));
        }
        if self.mode != Mode::Unopened {
            return Err(Error::InvalidOperation("connection is already open"));
        }
        let method = mode
            .method()
            .ok_or_else(|| Error::InvalidArgument("open mode must be Reading or Writing".into()))?;

        let transport = self.connector.connect(target.host, target.port, timeouts)?;
        self.transport = Some(transport);
        self.mode = mode;
        self.reset_exchange();

        if mode == Mode::Writing {
            if size > 0 {
                self.has_content_length = true;
                self.content_length = size;
                self.bytes_remaining = size;
            } else {
                self.is_chunked = true;
            }
        }

        let head = RequestBuilder::new(method, target.host, target.path)
            .date(now)
            .content_length(self.has_content_length.then_some(self.content_length))
            .sign(credentials);

        let Some(transport) = self.transport.as_mut() else {
            return Err(Error::InvalidOperation("connection is not open"));
        };
        transport.send_all(&head.encode())?;

        debug!(
            method = method.as_str(),
            host = target.host,
            port = target.port,
            path = target.path,
            content_length = ?head.header("Content-Length"),
            "Request sent"
        );

        if mode == Mode::Reading {
            return self.read_response();
        }
        Ok(())
    }

    /// Disconnect and return to [`Mode::Unopened`].
    ///
    /// The state changes even if the transport reports an error on the way
    /// down; that error is still returned.
    pub fn close(&mut self) -> Result<()> {
        if self.mode == Mode::Unopened {
            return Err(Error::InvalidOperation("connection is not open"));
        }

        let result = match self.transport.take() {
            Some(mut transport) => transport.disconnect(),
            None => Ok(()),
        };
        self.mode = Mode::Unopened;
        self.deferred_error = None;

        match &result {
            Ok(()) => debug!("Connection closed"),
            Err(e) => warn!(error = %e, "Disconnect failed"),
        }
        result
    }

    /// Parse the response header block.
    ///
    /// Runs during `open` for reads and after the last body byte for writes.
    /// Calling it again once the block has been parsed does nothing and
    /// returns `Ok(())`.
    pub fn read_response(&mut self) -> Result<()> {
        if self.response_received {
            return Ok(());
        }
        let Some(transport) = self.transport.as_mut() else {
            return Err(Error::InvalidOperation("connection is not open"));
        };

        self.response.clear();
        if self.mode == Mode::Reading {
            self.content_length = 0;
            self.bytes_remaining = 0;
            self.has_content_length = false;
            self.is_chunked = false;
        }

        loop {
            let received = self.buffer.fill_from(transport)?;
            if received == 0 {
                return Err(Error::ConnectionReset);
            }
            trace!(bytes = received, "Receive buffer refilled");

            if self.parser.feed(&mut self.buffer, &mut self.response)? {
                break;
            }
        }
        self.response_received = true;

        if self.mode == Mode::Reading {
            if let Some(length) = self.response.content_length()? {
                self.content_length = length;
                self.bytes_remaining = length;
                self.has_content_length = true;
            }
            self.is_chunked = self.response.is_chunked();
        }

        let status = self.response.status()?;
        debug!(
            status = status.as_u16(),
            content_length = ?self.has_content_length.then_some(self.content_length),
            chunked = self.is_chunked,
            "Response received"
        );
        status.into_result()
    }

    /// Read body bytes into `buf`.
    ///
    /// Returns the number of bytes delivered, which may be less than
    /// requested. `Ok(0)` for a non-empty `buf` means the whole body has
    /// been read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.mode != Mode::Reading {
            return Err(Error::InvalidOperation("connection is not open for reading"));
        }
        self.check_framing()?;
        if let Some(err) = self.deferred_error.take() {
            return Err(err);
        }

        let wanted = buf.len().min(usize::try_from(self.bytes_remaining).unwrap_or(usize::MAX));
        if wanted == 0 {
            return Ok(0);
        }

        // Body bytes that arrived together with the response head go first.
        let mut delivered = self.buffer.take_into(&mut buf[..wanted]);

        if delivered < wanted {
            let Some(transport) = self.transport.as_mut() else {
                return Err(Error::InvalidOperation("connection is not open"));
            };
            match transport.recv(&mut buf[delivered..wanted]) {
                Ok(0) if delivered == 0 => return Err(Error::ConnectionReset),
                Ok(n) => delivered += n,
                Err(err) if delivered == 0 => return Err(err),
                Err(err) => {
                    trace!(error = %err, delivered, "Deferring receive error");
                    self.deferred_error = Some(err);
                }
            }
        }

        self.bytes_remaining -= delivered as u64;
        trace!(delivered, remaining = self.bytes_remaining, "Body read");
        Ok(delivered)
    }

    /// Write body bytes.
    ///
    /// Never sends more than the length announced at `open`: a larger `buf`
    /// is rejected without sending anything. Once the last byte is out the
    /// response head is parsed; its failure is returned from this call.
    ///
    /// In that case the `Err` replaces the count, although the bytes of
    /// this call were sent. `bytes_remaining()` is then `0` and the status
    /// line can still be queried.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.mode != Mode::Writing {
            return Err(Error::InvalidOperation("connection is not open for writing"));
        }
        self.check_framing()?;
        if buf.len() as u64 > self.bytes_remaining {
            return Err(Error::InvalidOperation("write exceeds the declared content length"));
        }

        let Some(transport) = self.transport.as_mut() else {
            return Err(Error::InvalidOperation("connection is not open"));
        };
        let sent = transport.send(buf)?;
        self.bytes_remaining -= sent as u64;
        trace!(sent, remaining = self.bytes_remaining, "Body written");

        if self.bytes_remaining == 0 {
            self.read_response()?;
        }
        Ok(sent)
    }

    /// The response status line, without its CRLF.
    pub fn status_line(&self) -> Result<&str> {
        self.require_open()?;
        Ok(&self.response.status_line)
    }

    /// A response field by name (matched case-insensitively).
    pub fn response_field(&self, name: &str) -> Result<&str> {
        self.require_open()?;
        let key = name.to_ascii_lowercase();
        self.response
            .field(&key)
            .ok_or(Error::NoSuchField(key))
    }

    /// The body length: announced by the response when reading, declared by
    /// the caller when writing.
    pub fn content_length(&self) -> Result<u64> {
        self.require_open()?;
        if !self.has_content_length {
            return Err(Error::NoSuchField("content-length".into()));
        }
        Ok(self.content_length)
    }

    fn require_open(&self) -> Result<()> {
        if self.mode == Mode::Unopened {
            return Err(Error::InvalidOperation("connection is not open"));
        }
        Ok(())
    }

    fn check_framing(&self) -> Result<()> {
        if self.is_chunked || !self.has_content_length {
            return Err(Error::Unsupported("chunked or unbounded message body"));
        }
        Ok(())
    }

    fn reset_exchange(&mut self) {
        self.buffer.clear();
        self.parser.reset();
        self.response.clear();
        self.response_received = false;
        self.content_length = 0;
        self.bytes_remaining = 0;
        self.has_content_length = false;
        self.is_chunked = false;
        self.deferred_error = None;
    }
}

impl<C: Connector> Drop for Connection<C> {
    fn drop(&mut self) {
        if self.mode != Mode::Unopened {
            // `close` already logs a failed disconnect.
            let _ = self.close();
        }
    }
}

impl<C: Connector> std::fmt::Debug for Connection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("mode", &self.mode)
            .field("response_received", &self.response_received)
            .field("status_line", &self.response.status_line)
            .field("content_length", &self.content_length)
            .field("bytes_remaining", &self.bytes_remaining)
            .field("has_content_length", &self.has_content_length)
            .field("is_chunked", &self.is_chunked)
            .finish()
    }
}
