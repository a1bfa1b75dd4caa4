//! Allow-list management.
//!
//! New identities are registered with role `user` on their first sign-in.
//! These commands let an operator promote them, revoke access, or audit the
//! list.

use relyce_backend::db::PgAdminUserStore;
use relyce_backend::{AdminUserStore, RepositoryError};
use relyce_core::{AdminRole, AdminUser, IdentityUid};

use super::{CommandError, connect_pool};

pub async fn connect() -> Result<PgAdminUserStore, CommandError> {
    Ok(PgAdminUserStore::new(connect_pool().await?))
}

fn describe(user: &AdminUser) -> String {
    format!(
        "{uid}  {email}  {role}  since {created}",
        uid = user.uid,
        email = user.email,
        role = user.role,
        created = user.created_at.format("%Y-%m-%d"),
    )
}

/// One line per allow-list record.
pub async fn list(store: &dyn AdminUserStore) -> Result<Vec<String>, CommandError> {
    let users = store.list().await?;
    if users.is_empty() {
        return Ok(vec!["Allow-list is empty".to_owned()]);
    }
    Ok(users.iter().map(describe).collect())
}

async fn set_role(
    store: &dyn AdminUserStore,
    uid: &str,
    role: AdminRole,
) -> Result<(), CommandError> {
    let uid = IdentityUid::new(uid);
    match store.set_role(&uid, role).await {
        Ok(()) => {
            tracing::info!(%uid, %role, "Role updated");
            Ok(())
        }
        Err(RepositoryError::NotFound) => Err(CommandError::UnknownUid(uid.to_string())),
        Err(e) => Err(e.into()),
    }
}

pub async fn promote(store: &dyn AdminUserStore, uid: &str) -> Result<(), CommandError> {
    set_role(store, uid, AdminRole::Admin).await
}

pub async fn demote(store: &dyn AdminUserStore, uid: &str) -> Result<(), CommandError> {
    set_role(store, uid, AdminRole::User).await
}
