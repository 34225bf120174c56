use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::http::buffer::{DEFAULT_CAPACITY, MIN_CAPACITY};
use crate::net::Timeouts;
use crate::signing::Credentials;

/// Client settings, loaded from YAML and/or the environment.
///
/// ```yaml
/// endpoint: http://storage.local:9000
/// access_key: AKID
/// secret_key: secret
/// connect_timeout_ms: 2000
/// socket_timeout_ms: 10000
/// buffer_size: 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL objects are addressed relative to.
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    /// `0` waits forever.
    pub connect_timeout_ms: u64,
    /// `0` waits forever.
    pub socket_timeout_ms: u64,
    /// Receive buffer capacity per stream.
    pub buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: String::new(),
            secret_key: String::new(),
            connect_timeout_ms: 0,
            socket_timeout_ms: 0,
            buffer_size: DEFAULT_CAPACITY,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `S3LITE_CONFIG`, then the
    /// individual `S3LITE_*` variables.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("S3LITE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidArgument(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidArgument(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Override fields from variables looked up through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = var("S3LITE_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(key) = var("S3LITE_ACCESS_KEY") {
            self.access_key = key;
        }
        if let Some(key) = var("S3LITE_SECRET_KEY") {
            self.secret_key = key;
        }
        if let Some(ms) = var("S3LITE_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = parse_ms("S3LITE_CONNECT_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = var("S3LITE_SOCKET_TIMEOUT_MS") {
            self.socket_timeout_ms = parse_ms("S3LITE_SOCKET_TIMEOUT_MS", &ms)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size < MIN_CAPACITY {
            return Err(Error::InvalidArgument(format!(
                "buffer_size must be at least {MIN_CAPACITY}, got {}",
                self.buffer_size
            )));
        }
        if let Some(endpoint) = &self.endpoint {
            crate::client::url::parse(endpoint)?;
        }
        Ok(())
    }

    /// Credentials for signing; both keys must be set.
    pub fn credentials(&self) -> Result<Credentials> {
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(Error::InvalidArgument(
                "access_key and secret_key must both be set".into(),
            ));
        }
        Ok(Credentials::new(&self.access_key, &self.secret_key))
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts::new(
            non_zero_ms(self.connect_timeout_ms),
            non_zero_ms(self.socket_timeout_ms),
        )
    }

    /// Join `key` onto the configured endpoint.
    pub fn object_url(&self, key: &str) -> Result<String> {
        let Some(endpoint) = &self.endpoint else {
            return Err(Error::InvalidArgument("no endpoint configured".into()));
        };
        Ok(format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            key.trim_start_matches('/')
        ))
    }
}

fn parse_ms(name: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("{name} is not a number: {value:?}")))
}

fn non_zero_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}
