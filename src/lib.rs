//! s3lite - minimal S3 object client
//!
//! Streams single objects to and from an S3-compatible server over plain
//! HTTP/1.1, signing each request with the `AWS` HMAC-SHA1 scheme.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod net;
pub mod signing;

pub use client::{Client, Stream};
pub use config::Config;
pub use error::{Error, Result};
pub use http::Mode;
pub use net::Timeouts;
pub use signing::Credentials;
