use std::time::SystemTime;

use bytes::{BufMut, BytesMut};

use crate::signing::{self, Credentials};

/// Content type sent with (and signed into) every request.
pub const CONTENT_TYPE: &str = "application/octet-stream";

/// HTTP request methods used by the client.
///
/// Reading an object is a GET, writing one is a PUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve an object
    GET,
    /// PUT - Store an object
    PUT,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
        }
    }
}

/// Format a timestamp the way HTTP/1.1 expects it in a `Date` field
/// (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(at: SystemTime) -> String {
    httpdate::fmt_http_date(at)
}

/// A signed request head, ready to be written to the transport.
///
/// Fields are kept in the order they are sent.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Builder for signed request heads.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
    method: Method,
    host: &'a str,
    path: &'a str,
    date: Option<SystemTime>,
    content_length: Option<u64>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(method: Method, host: &'a str, path: &'a str) -> Self {
        Self {
            method,
            host,
            path,
            date: None,
            content_length: None,
        }
    }

    /// Sign with this timestamp instead of the current time.
    pub fn date(mut self, at: SystemTime) -> Self {
        self.date = Some(at);
        self
    }

    pub fn content_length(mut self, length: Option<u64>) -> Self {
        self.content_length = length;
        self
    }

    /// Sign the request with `credentials` and produce the head.
    pub fn sign(self, credentials: &Credentials) -> RequestHead {
        let date = http_date(self.date.unwrap_or_else(SystemTime::now));
        let string_to_sign =
            signing::string_to_sign(self.method.as_str(), CONTENT_TYPE, &date, self.path);
        let signature = signing::sign(credentials.secret_key.as_bytes(), string_to_sign.as_bytes());

        let mut headers = vec![
            ("Host", self.host.to_string()),
            ("Content-Type", CONTENT_TYPE.to_string()),
            ("Date", date),
            (
                "Authorization",
                signing::authorization(&credentials.access_key, &signature),
            ),
        ];
        if let Some(length) = self.content_length {
            headers.push(("Content-Length", length.to_string()));
        }

        RequestHead {
            method: self.method,
            path: self.path.to_string(),
            headers,
        }
    }
}

impl RequestHead {
    /// Retrieves a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serialize the request line, the fields and the blank line.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(256);

        buf.put_slice(self.method.as_str().as_bytes());
        buf.put_u8(b' ');
        buf.put_slice(self.path.as_bytes());
        buf.put_slice(b" HTTP/1.1\r\n");

        for (name, value) in &self.headers {
            buf.put_slice(name.as_bytes());
            buf.put_slice(b": ");
            buf.put_slice(value.as_bytes());
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"\r\n");
        buf
    }
}
