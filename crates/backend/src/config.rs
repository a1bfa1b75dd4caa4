//! Environment helpers shared by the site, the admin dashboard and the CLI.
//!
//! Each binary owns its own config struct; this module provides the common
//! lookups plus secret validation (placeholder blocklist and entropy check).
//!
//! # Environment Variables
//!
//! ## Object storage (site and admin)
//! - `STORAGE_ROOT` - Directory holding uploaded objects (default: ./storage)
//! - `STORAGE_SIGNING_SECRET` - HMAC key for signed download links (min 32 chars, high entropy)
//! - `SIGNED_URL_TTL_SECS` - Lifetime of a signed link (default: 3600)
//! - `STORAGE_LINK_BASE_URL` - Origin serving signed links, i.e. the admin
//!   dashboard (default: <http://127.0.0.1:3001>)

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Minimum length of any signing or session secret.
pub const MIN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Object storage settings.
#[derive(Clone)]
pub struct StorageConfig {
    /// Directory objects are written under
    pub root: PathBuf,
    /// HMAC key for signed download links
    pub signing_secret: SecretString,
    /// How long a signed link stays valid
    pub signed_url_ttl: Duration,
    /// Origin that serves `/storage/...` signed links
    pub link_base_url: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("root", &self.root)
            .field("signing_secret", &"[REDACTED]")
            .field("signed_url_ttl", &self.signed_url_ttl)
            .field("link_base_url", &self.link_base_url)
            .finish()
    }
}

impl StorageConfig {
    /// Load storage settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the signing secret is missing or weak, or the
    /// TTL is not a number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_secret = get_validated_secret("STORAGE_SIGNING_SECRET")?;
        validate_secret_length(&signing_secret, "STORAGE_SIGNING_SECRET")?;
        let ttl_secs: u64 = parse_env_or_default(
            "SIGNED_URL_TTL_SECS",
            &DEFAULT_SIGNED_URL_TTL_SECS.to_string(),
        )?;

        Ok(Self {
            root: PathBuf::from(get_env_or_default("STORAGE_ROOT", "./storage")),
            signing_secret,
            signed_url_ttl: Duration::from_secs(ttl_secs),
            link_base_url: get_env_or_default("STORAGE_LINK_BASE_URL", "http://127.0.0.1:3001"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if the variable is unset.
pub fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` naming `primary_key` if neither is set.
pub fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, ignoring empty values.
#[must_use]
pub fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
#[must_use]
pub fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the value does not parse.
pub fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a secret meets minimum length requirements.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the secret is too short.
pub fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
///
/// # Errors
///
/// Returns `ConfigError` if the variable is missing or looks insecure.
pub fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
