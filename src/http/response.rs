use std::collections::HashMap;

use crate::error::{Error, Result};

/// The only protocol version the client speaks.
pub const HTTP_VERSION_PREFIX: &str = "HTTP/1.1 ";

/// HTTP status codes the client distinguishes.
///
/// Everything except 200, 403 and 404 is reported as a generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// Any other code
    Other(u16),
}

impl StatusCode {
    pub fn from_u16(code: u16) -> Self {
        match code {
            200 => StatusCode::Ok,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            other => StatusCode::Other(other),
        }
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use s3lite::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Other(500).as_u16(), 500);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::Other(code) => *code,
        }
    }

    /// Parse the code out of a status line such as `HTTP/1.1 200 OK`.
    ///
    /// Anything that is not `HTTP/1.1 ` followed by three digits is
    /// [`Error::Unsupported`].
    pub fn from_status_line(line: &str) -> Result<Self> {
        let digits = line
            .strip_prefix(HTTP_VERSION_PREFIX)
            .and_then(|rest| rest.as_bytes().get(..3))
            .filter(|d| d.iter().all(u8::is_ascii_digit))
            .ok_or(Error::Unsupported("response is not HTTP/1.1"))?;

        let code = digits
            .iter()
            .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
        Ok(Self::from_u16(code))
    }

    /// Map the status onto the client's result type.
    pub fn into_result(self) -> Result<()> {
        match self {
            StatusCode::Ok => Ok(()),
            StatusCode::Forbidden => Err(Error::Forbidden),
            StatusCode::NotFound => Err(Error::NotFound),
            StatusCode::Other(code) => Err(Error::Other(format!("unexpected HTTP status {code}"))),
        }
    }
}

/// Status line and fields of a received response.
#[derive(Debug, Default, Clone)]
pub struct ResponseHead {
    /// First response line without its CRLF.
    pub status_line: String,
    /// Lower-cased field names mapped to trimmed values.
    pub fields: HashMap<String, String>,
}

impl ResponseHead {
    pub fn clear(&mut self) {
        self.status_line.clear();
        self.fields.clear();
    }

    /// Look a field up by its lower-cased name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.as_str())
    }

    /// The `content-length` field, if present.
    ///
    /// A present but non-numeric value is a malformed response.
    pub fn content_length(&self) -> Result<Option<u64>> {
        self.field("content-length")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| Error::other(format!("invalid content-length: {v:?}")))
            })
            .transpose()
    }

    /// `true` if `transfer-encoding` mentions `chunked`.
    pub fn is_chunked(&self) -> bool {
        self.field("transfer-encoding")
            .is_some_and(|v| v.contains("chunked"))
    }

    pub fn status(&self) -> Result<StatusCode> {
        StatusCode::from_status_line(&self.status_line)
    }
}
