//! Database migration command.
//!
//! Applies the document store migrations embedded in `relyce-backend`, then
//! creates the `admin.session` table used by the dashboard's session store.

use relyce_admin::middleware::session_store;
use relyce_backend::db::MIGRATOR;

use super::{CommandError, connect_pool};

/// Run every migration against the configured database.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect_pool().await?;

    tracing::info!("Running document store migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Creating session table...");
    session_store(&pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
