//! Subcommand implementations.

pub mod admin;
pub mod migrate;

use relyce_backend::RepositoryError;
use relyce_backend::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Store(#[from] RepositoryError),

    #[error("No allow-list record for uid {0}. The user must sign in once first.")]
    UnknownUid(String),
}

/// Connect using `ADMIN_DATABASE_URL`, falling back to `DATABASE_URL`.
pub async fn connect_pool() -> Result<sqlx::PgPool, CommandError> {
    let database_url = relyce_backend::config::get_database_url("ADMIN_DATABASE_URL")?;
    tracing::info!("Connecting to database...");
    Ok(relyce_backend::db::create_pool(&database_url).await?)
}
