//! Request signing for the S3 `AWS` authorization scheme.
//!
//! The signature is `Base64(HMAC-SHA1(secret_key, string_to_sign))`, with
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +      (always empty here)
//!                Content-Type + "\n" +
//!                Date + "\n" +
//!                Path
//! ```
//!
//! SHA-1, HMAC and Base64 are implemented in this module so that the client
//! carries no cryptographic dependencies.

pub mod base64;
pub mod hmac;
pub mod sha1;

use std::fmt;

/// Length of an encoded signature: 20 digest bytes in Base64.
pub const SIGNATURE_LEN: usize = self::base64::encoded_len(self::sha1::DIGEST_LEN);

/// A Base64-encoded HMAC-SHA1 signature (always 28 ASCII characters).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub fn as_str(&self) -> &str {
        // Only Base64 alphabet characters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.as_str()).finish()
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Access key and secret key of an account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Sign `message` with `key`: HMAC-SHA1 followed by Base64.
pub fn sign(key: &[u8], message: &[u8]) -> Signature {
    let digest = self::hmac::hmac_sha1(key, message);
    let mut out = [0u8; SIGNATURE_LEN];
    self::base64::encode_into(&digest, &mut out);
    Signature(out)
}

/// Build the string to sign for a request without `Content-MD5` or
/// `x-amz-*` headers.
pub fn string_to_sign(method: &str, content_type: &str, date: &str, path: &str) -> String {
    format!("{method}\n\n{content_type}\n{date}\n{path}")
}

/// Value of the `Authorization` header: `AWS <access_key>:<signature>`.
pub fn authorization(access_key: &str, signature: &Signature) -> String {
    format!("AWS {access_key}:{signature}")
}
