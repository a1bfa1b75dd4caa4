//! Admin allow-list repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use relyce_core::{AdminRole, AdminUser, IdentityUid};

use super::{AdminUserStore, RepositoryError};

/// Internal row type for `PostgreSQL` admin user queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    uid: String,
    email: String,
    role: AdminRole,
    created_at: DateTime<Utc>,
}

impl From<AdminUserRow> for AdminUser {
    fn from(row: AdminUserRow) -> Self {
        Self {
            uid: IdentityUid::new(row.uid),
            email: row.email,
            role: row.role,
            created_at: row.created_at,
        }
    }
}

/// Allow-list store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgAdminUserStore {
    pool: PgPool,
}

impl PgAdminUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminUserStore for PgAdminUserStore {
    async fn get(&self, uid: &IdentityUid) -> Result<Option<AdminUser>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            "SELECT uid, email, role, created_at FROM admin_user WHERE uid = $1",
        )
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), fields(uid = %uid))]
    async fn create(
        &self,
        uid: &IdentityUid,
        email: &str,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            INSERT INTO admin_user (uid, email, role)
            VALUES ($1, $2, $3)
            RETURNING uid, email, role, created_at
            ",
        )
        .bind(uid.as_str())
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminUserRow>(
            "SELECT uid, email, role, created_at FROM admin_user ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), fields(uid = %uid))]
    async fn set_role(&self, uid: &IdentityUid, role: AdminRole) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE admin_user SET role = $2 WHERE uid = $1")
            .bind(uid.as_str())
            .bind(role)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
