//! Document store: submitters, their child records, and the admin allow-list.
//!
//! # Tables
//!
//! - `submitter` - One row per email address that has submitted a form
//! - `contact_inquiry` - Contact form submissions (child of `submitter`)
//! - `internship_application` - Internship applications (child of `submitter`)
//! - `admin_user` - Allow-list keyed by identity-provider uid
//!
//! # Migrations
//!
//! Migrations are stored in `crates/backend/migrations/` and run via:
//! ```bash
//! cargo run -p relyce-cli -- migrate
//! ```

pub mod admin_users;
pub mod submissions;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use relyce_core::{
    AdminRole, AdminUser, ChildRef, ContactInquiry, ContactInquiryId, ContactSubmission, Email,
    IdentityUid, InternshipApplication, InternshipApplicationId, InternshipSubmission, Submitter,
    SubmitterId,
};

pub use admin_users::PgAdminUserStore;
pub use submissions::PgSubmissionStore;

/// Embedded migrations for the document store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// `SQLSTATE` for `insufficient_privilege`.
const PG_INSUFFICIENT_PRIVILEGE: &str = "42501";
/// `SQLSTATE` for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The store refused the operation for the current credentials.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique uid).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Failure injected by an in-memory store.
    #[error("{0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        let code = err
            .as_database_error()
            .and_then(|db| db.code().map(|c| (c.into_owned(), db.message().to_owned())));
        match code {
            Some((code, message)) if code == PG_INSUFFICIENT_PRIVILEGE => {
                Self::PermissionDenied(message)
            }
            Some((code, message)) if code == PG_UNIQUE_VIOLATION => Self::Conflict(message),
            _ => Self::Database(err),
        }
    }
}

impl RepositoryError {
    /// Whether this is a permission failure rather than an outage.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

/// Submitter hierarchy operations used by the forms and the dashboard.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Create the submitter for `email`, or refresh its name and
    /// last-submission time if it already exists.
    async fn upsert_submitter(
        &self,
        full_name: &str,
        email: &Email,
    ) -> Result<SubmitterId, RepositoryError>;

    async fn create_contact_inquiry(
        &self,
        submitter_id: SubmitterId,
        inquiry: &ContactSubmission,
    ) -> Result<ContactInquiryId, RepositoryError>;

    /// Record an internship application that references an uploaded résumé.
    async fn create_internship_application(
        &self,
        submitter_id: SubmitterId,
        application: &InternshipSubmission,
        resume_path: &str,
    ) -> Result<InternshipApplicationId, RepositoryError>;

    /// Full scan of submitters, oldest first.
    async fn list_submitters(&self) -> Result<Vec<Submitter>, RepositoryError>;

    async fn list_contact_inquiries(
        &self,
        submitter_id: SubmitterId,
    ) -> Result<Vec<ContactInquiry>, RepositoryError>;

    async fn list_internship_applications(
        &self,
        submitter_id: SubmitterId,
    ) -> Result<Vec<InternshipApplication>, RepositoryError>;

    /// Delete one child record. Deleting a record that no longer exists
    /// succeeds.
    async fn delete_child(
        &self,
        submitter_id: SubmitterId,
        child: ChildRef,
    ) -> Result<(), RepositoryError>;
}

/// Allow-list operations used by the authorization gate and the CLI.
#[async_trait]
pub trait AdminUserStore: Send + Sync {
    async fn get(&self, uid: &IdentityUid) -> Result<Option<AdminUser>, RepositoryError>;

    /// Create a record for `uid`.
    ///
    /// Returns `RepositoryError::Conflict` if one already exists.
    async fn create(
        &self,
        uid: &IdentityUid,
        email: &str,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError>;

    async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError>;

    /// Change the role of an existing record.
    ///
    /// Returns `RepositoryError::NotFound` if there is no record for `uid`.
    async fn set_role(&self, uid: &IdentityUid, role: AdminRole) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
