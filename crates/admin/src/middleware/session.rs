//! Session middleware configuration for admin.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with a signed
//! cookie. SameSite is Lax so the cookie survives the redirect back from
//! Google.

use sqlx::PgPool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use secrecy::ExposeSecret;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "relyce_admin_session";

/// Schema and table holding session rows.
pub const SESSION_SCHEMA: &str = "admin";
pub const SESSION_TABLE: &str = "session";

/// Session expiry time in seconds (12 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 12 * 60 * 60;

/// `PostgreSQL` session store in the `admin.session` table.
///
/// The table is created by `relyce-cli migrate`.
///
/// # Panics
///
/// Panics if the schema name or table name is invalid (should never happen
/// with the hardcoded values above).
#[must_use]
pub fn session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
        .with_schema_name(SESSION_SCHEMA)
        .expect("valid schema name")
        .with_table_name(SESSION_TABLE)
        .expect("valid table name")
}

/// Create the session layer with `PostgreSQL` store.
///
/// # Errors
///
/// Returns an error if the session secret is too short to sign cookies.
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, tower_sessions::cookie::KeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(session_store(pool))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
