//! Error types shared by every layer of the client.
//!
//! Each variant corresponds to one failure class the protocol can report.
//! Success is simply `Ok(..)`.

use std::io;
use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the client, the connection engine and the transport.
#[derive(Error, Debug)]
pub enum Error {
    /// An unspecified error, including malformed responses and unexpected
    /// HTTP status codes.
    #[error("An unspecified error occurred: {0}")]
    Other(String),

    /// An invalid argument was passed to a function.
    #[error("An invalid argument was passed to a function: {0}")]
    InvalidArgument(String),

    /// The call is not valid in the current connection state.
    #[error("An invalid operation was requested: {0}")]
    InvalidOperation(&'static str),

    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("An invalid URL was passed to a function: {0}")]
    InvalidUrl(String),

    /// Host name resolution failed.
    #[error("No such host was found: {0}")]
    NoHost(String),

    /// Access denied by the local system.
    #[error("Access denied")]
    Denied,

    /// The connection was refused.
    #[error("The connection was refused")]
    Refused,

    /// The network is unreachable.
    #[error("The network is unreachable")]
    Unreachable,

    /// The connection was reset or closed by the peer.
    #[error("The connection was reset by the peer")]
    ConnectionReset,

    /// The operation timed out.
    #[error("The operation timed out")]
    Timeout,

    /// An unsupported protocol feature was encountered (chunked bodies,
    /// responses that are not HTTP/1.1).
    #[error("An unsupported protocol function was encountered: {0}")]
    Unsupported(&'static str),

    /// The requested response field was not present.
    #[error("The requested field was not found: {0}")]
    NoSuchField(String),

    /// HTTP 403.
    #[error("The server refused to authorize the request")]
    Forbidden,

    /// HTTP 404.
    #[error("The object was not found")]
    NotFound,
}

impl Error {
    /// Create a generic error from any message.
    pub fn other(message: impl Into<String>) -> Self {
        Error::Other(message.into())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Error::Refused,
            io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof => Error::ConnectionReset,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Error::Timeout,
            io::ErrorKind::PermissionDenied => Error::Denied,
            io::ErrorKind::NetworkUnreachable | io::ErrorKind::HostUnreachable => {
                Error::Unreachable
            }
            _ => Error::Other(err.to_string()),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match &err {
            Error::Refused => io::ErrorKind::ConnectionRefused,
            Error::ConnectionReset => io::ErrorKind::ConnectionReset,
            Error::Timeout => io::ErrorKind::TimedOut,
            Error::Denied | Error::Forbidden => io::ErrorKind::PermissionDenied,
            Error::NotFound | Error::NoSuchField(_) => io::ErrorKind::NotFound,
            Error::InvalidArgument(_) | Error::InvalidUrl(_) => io::ErrorKind::InvalidInput,
            Error::Unsupported(_) => io::ErrorKind::Unsupported,
            Error::Unreachable => io::ErrorKind::NetworkUnreachable,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_io_errors_by_kind() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(matches!(Error::from(refused), Error::Refused));

        let timed_out = io::Error::from(io::ErrorKind::WouldBlock);
        assert!(matches!(Error::from(timed_out), Error::Timeout));

        let pipe = io::Error::from(io::ErrorKind::BrokenPipe);
        assert!(matches!(Error::from(pipe), Error::ConnectionReset));

        let odd = io::Error::other("odd");
        assert!(matches!(Error::from(odd), Error::Other(_)));
    }

    #[test]
    fn converts_back_into_io_error() {
        let err: io::Error = Error::NotFound.into();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
