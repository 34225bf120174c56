//! Splitting object URLs into the pieces a connection needs.

use url::{Host, Url};

use crate::error::{Error, Result};

/// Components of an object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Everything from the first `/` after the authority, query and fragment
    /// included.
    pub path: String,
}

/// Parse `input` into scheme, host, port and path.
///
/// The port defaults to the scheme's well-known port, or 80 for schemes
/// without one. User info in the authority is rejected. The path is taken
/// verbatim from `input`: no dot-segment removal, no percent-encoding.
///
/// # Example
///
/// ```
/// let parts = s3lite::client::url::parse("http://myhost/hello/world").unwrap();
/// assert_eq!(parts.host, "myhost");
/// assert_eq!(parts.port, 80);
/// assert_eq!(parts.path, "/hello/world");
/// ```
pub fn parse(input: &str) -> Result<UrlParts> {
    let url = Url::parse(input).map_err(|e| Error::InvalidUrl(format!("{input}: {e}")))?;

    if !url.username().is_empty() || url.password().is_some() {
        return Err(Error::InvalidUrl(format!("{input}: user info is not supported")));
    }

    let host = match url.host() {
        Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        _ => return Err(Error::InvalidUrl(format!("{input}: missing host"))),
    };

    let port = url.port_or_known_default().unwrap_or(80);
    if port == 0 {
        return Err(Error::InvalidUrl(format!("{input}: port 0")));
    }

    let path = raw_path(input)?;

    Ok(UrlParts {
        scheme: url.scheme().to_string(),
        host,
        port,
        path,
    })
}

/// Everything from the first `/`, `?` or `#` after the authority, exactly as
/// written. An empty path becomes `/`.
fn raw_path(input: &str) -> Result<String> {
    let Some(scheme_end) = input.find("://") else {
        return Err(Error::InvalidUrl(format!("{input}: missing \"://\"")));
    };
    let rest = &input[scheme_end + 3..];
    let path = match rest.find(['/', '?', '#']) {
        Some(start) if rest[start..].starts_with('/') => rest[start..].to_string(),
        Some(start) => format!("/{}", &rest[start..]),
        None => "/".to_string(),
    };
    Ok(path)
}
