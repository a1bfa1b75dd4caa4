//! HMAC-SHA256 signed download links.
//!
//! A link looks like `{base}/storage/{path}?expires={unix}&signature={hex}`.
//! The signature covers `path` and `expires` joined by a newline.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// Route prefix the admin binary serves signed objects under.
pub const SIGNED_ROUTE_PREFIX: &str = "storage";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("signed link has expired")]
    Expired,
    #[error("signature mismatch")]
    BadSignature,
    #[error("invalid signing key: {0}")]
    InvalidKey(String),
    #[error("invalid link base: {0}")]
    InvalidBase(String),
}

/// Issues and verifies signed links.
#[derive(Clone)]
pub struct UrlSigner {
    secret: SecretString,
    base_url: Url,
    ttl: Duration,
}

impl std::fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSigner")
            .field("secret", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl UrlSigner {
    /// # Errors
    ///
    /// Returns `SigningError::InvalidBase` if `base_url` cannot carry a path.
    pub fn new(secret: SecretString, base_url: &str, ttl: Duration) -> Result<Self, SigningError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| SigningError::InvalidBase(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SigningError::InvalidBase(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            secret,
            base_url,
            ttl,
        })
    }

    fn mac(&self, path: &str, expires: i64) -> Result<HmacSha256, SigningError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }

    /// Sign `path`, valid until `now + ttl`.
    ///
    /// # Errors
    ///
    /// Returns `SigningError` if the key is unusable or the path cannot be
    /// joined onto the base URL.
    pub fn sign(&self, path: &str, now: DateTime<Utc>) -> Result<Url, SigningError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = now.timestamp().saturating_add(ttl);
        let signature = hex::encode(self.mac(path, expires)?.finalize().into_bytes());

        let mut url = self
            .base_url
            .join(&format!("{SIGNED_ROUTE_PREFIX}/{path}"))
            .map_err(|e| SigningError::InvalidBase(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("expires", &expires.to_string())
            .append_pair("signature", &signature);
        Ok(url)
    }

    /// Check a link's `expires` and `signature` for `path`.
    ///
    /// # Errors
    ///
    /// Returns `SigningError::Expired` or `SigningError::BadSignature`.
    pub fn verify(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SigningError> {
        let provided = hex::decode(signature).map_err(|_| SigningError::BadSignature)?;
        // verify_slice compares in constant time
        self.mac(path, expires)?
            .verify_slice(&provided)
            .map_err(|_| SigningError::BadSignature)?;
        if now.timestamp() > expires {
            return Err(SigningError::Expired);
        }
        Ok(())
    }
}
