//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_SESSION_SECRET` - Session cookie signing key (min 64 chars, high entropy)
//! - `GOOGLE_CLIENT_ID` - Google OAuth client ID
//! - `GOOGLE_CLIENT_SECRET` - Google OAuth client secret
//! - `STORAGE_SIGNING_SECRET` - HMAC key for résumé download links
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `ADMIN_BASE_URL` - Public URL, used for the OAuth redirect (default: <http://localhost:3001>)
//! - `DASHBOARD_CACHE_IDLE_SECS` - Idle lifetime of a cached dashboard (default: 1800)
//! - `STORAGE_ROOT`, `SIGNED_URL_TTL_SECS`, `STORAGE_LINK_BASE_URL` - see
//!   [`relyce_backend::config`]
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sampling (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use relyce_backend::config::{
    ConfigError, StorageConfig, get_database_url, get_env_or_default, get_optional_env,
    get_required_env, get_validated_secret, parse_env_or_default,
};
use secrecy::{ExposeSecret, SecretString};

/// Signed cookies need a 64-byte key.
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL for the dashboard
    pub base_url: String,
    /// Key for signing the session cookie
    pub session_secret: SecretString,
    pub google: GoogleConfig,
    pub storage: StorageConfig,
    /// How long an untouched dashboard snapshot stays cached
    pub dashboard_cache_idle: Duration,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Google OpenID Connect client credentials.
#[derive(Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl GoogleConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: get_required_env("GOOGLE_CLIENT_ID")?,
            client_secret: SecretString::from(get_required_env("GOOGLE_CLIENT_SECRET")?),
        })
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host: IpAddr = parse_env_or_default("ADMIN_HOST", "127.0.0.1")?;
        let port: u16 = parse_env_or_default("ADMIN_PORT", "3001")?;
        let base_url = get_env_or_default("ADMIN_BASE_URL", "http://localhost:3001");

        let session_secret = get_validated_secret("ADMIN_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "ADMIN_SESSION_SECRET")?;

        let google = GoogleConfig::from_env()?;
        let storage = StorageConfig::from_env()?;
        let dashboard_cache_idle =
            Duration::from_secs(parse_env_or_default("DASHBOARD_CACHE_IDLE_SECS", "1800")?);

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            google,
            storage,
            dashboard_cache_idle,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Where Google sends the browser back after sign-in.
    #[must_use]
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.base_url.trim_end_matches('/'))
    }

    /// Session cookies are marked `Secure` when served over HTTPS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let len = secret.expose_secret().len();
    if len < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(base_url: &str) -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/relyce".to_string()),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3001,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("x".repeat(64)),
            google: GoogleConfig {
                client_id: "client.apps.googleusercontent.com".to_string(),
                client_secret: SecretString::from("google-secret".to_string()),
            },
            storage: StorageConfig {
                root: PathBuf::from("./storage"),
                signing_secret: SecretString::from(
                    "k8Jq2mZ7vR4xN1pL9sT3wB6yC0dF5gHa".to_string(),
                ),
                signed_url_ttl: Duration::from_secs(60),
                link_base_url: "http://127.0.0.1:3001".to_string(),
            },
            dashboard_cache_idle: Duration::from_secs(60),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    #[test]
    fn test_redirect_uri_ignores_trailing_slash() {
        assert_eq!(
            config("https://admin.relyce.in/").oauth_redirect_uri(),
            "https://admin.relyce.in/auth/callback"
        );
        assert!(config("https://admin.relyce.in").is_secure());
        assert!(!config("http://localhost:3001").is_secure());
    }

    #[test]
    fn test_session_secret_length() {
        let short = SecretString::from("a".repeat(40));
        assert!(validate_session_secret(&short, "ADMIN_SESSION_SECRET").is_err());
        let long = SecretString::from("a".repeat(64));
        assert!(validate_session_secret(&long, "ADMIN_SESSION_SECRET").is_ok());
    }

    #[test]
    fn test_google_config_debug_redacts_secret() {
        let debug = format!("{:?}", config("http://localhost:3001").google);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("google-secret"));
    }
}
