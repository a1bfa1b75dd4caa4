//! `PostgreSQL` implementation of [`SubmissionStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use relyce_core::{
    ChildRef, ContactInquiry, ContactInquiryId, ContactMethod, ContactSubmission, Email,
    InternshipApplication, InternshipApplicationId, InternshipDomain, InternshipSubmission,
    Submitter, SubmitterId,
};

use super::{RepositoryError, SubmissionStore};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SubmitterRow {
    id: i32,
    full_name: String,
    email: String,
    last_submission_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubmitterRow> for Submitter {
    type Error = RepositoryError;

    fn try_from(row: SubmitterRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: SubmitterId::new(row.id),
            full_name: row.full_name,
            email,
            last_submission_at: row.last_submission_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ContactInquiryRow {
    id: i32,
    submitter_id: i32,
    phone: String,
    company: String,
    contact_method: ContactMethod,
    project_details: String,
    requirements: String,
    submitted_at: Option<DateTime<Utc>>,
}

impl From<ContactInquiryRow> for ContactInquiry {
    fn from(row: ContactInquiryRow) -> Self {
        Self {
            id: ContactInquiryId::new(row.id),
            submitter_id: SubmitterId::new(row.submitter_id),
            phone: row.phone,
            company: row.company,
            contact_method: row.contact_method,
            project_details: row.project_details,
            requirements: row.requirements,
            submitted_at: row.submitted_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InternshipApplicationRow {
    id: i32,
    submitter_id: i32,
    phone: String,
    college: String,
    contact_method: ContactMethod,
    domain: InternshipDomain,
    linkedin_url: String,
    about_you: String,
    why_internship: String,
    resume_path: Option<String>,
    resume_url: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
}

impl From<InternshipApplicationRow> for InternshipApplication {
    fn from(row: InternshipApplicationRow) -> Self {
        Self {
            id: InternshipApplicationId::new(row.id),
            submitter_id: SubmitterId::new(row.submitter_id),
            phone: row.phone,
            college: row.college,
            contact_method: row.contact_method,
            domain: row.domain,
            linkedin_url: row.linkedin_url,
            about_you: row.about_you,
            why_internship: row.why_internship,
            resume_path: row.resume_path,
            resume_url: row.resume_url,
            submitted_at: row.submitted_at,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

/// Submission store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self, full_name), fields(email = %email))]
    async fn upsert_submitter(
        &self,
        full_name: &str,
        email: &Email,
    ) -> Result<SubmitterId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO submitter (full_name, email, last_submission_at)
            VALUES ($1, $2, now())
            ON CONFLICT (email) DO UPDATE
                SET full_name = EXCLUDED.full_name,
                    last_submission_at = EXCLUDED.last_submission_at
            RETURNING id
            ",
        )
        .bind(full_name)
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(SubmitterId::new(id))
    }

    #[instrument(skip(self, inquiry))]
    async fn create_contact_inquiry(
        &self,
        submitter_id: SubmitterId,
        inquiry: &ContactSubmission,
    ) -> Result<ContactInquiryId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO contact_inquiry
                (submitter_id, phone, company, contact_method, project_details, requirements)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            ",
        )
        .bind(submitter_id)
        .bind(&inquiry.phone)
        .bind(&inquiry.company)
        .bind(inquiry.contact_method)
        .bind(&inquiry.project_details)
        .bind(&inquiry.requirements)
        .fetch_one(&self.pool)
        .await?;

        Ok(ContactInquiryId::new(id))
    }

    #[instrument(skip(self, application))]
    async fn create_internship_application(
        &self,
        submitter_id: SubmitterId,
        application: &InternshipSubmission,
        resume_path: &str,
    ) -> Result<InternshipApplicationId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO internship_application
                (submitter_id, phone, college, contact_method, domain, linkedin_url,
                 about_you, why_internship, resume_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(submitter_id)
        .bind(&application.phone)
        .bind(&application.college)
        .bind(application.contact_method)
        .bind(application.domain)
        .bind(application.linkedin.as_str())
        .bind(&application.about_you)
        .bind(&application.why_internship)
        .bind(resume_path)
        .fetch_one(&self.pool)
        .await?;

        Ok(InternshipApplicationId::new(id))
    }

    async fn list_submitters(&self) -> Result<Vec<Submitter>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubmitterRow>(
            r"
            SELECT id, full_name, email, last_submission_at, created_at
            FROM submitter
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_contact_inquiries(
        &self,
        submitter_id: SubmitterId,
    ) -> Result<Vec<ContactInquiry>, RepositoryError> {
        let rows = sqlx::query_as::<_, ContactInquiryRow>(
            r"
            SELECT id, submitter_id, phone, company, contact_method,
                   project_details, requirements, submitted_at
            FROM contact_inquiry
            WHERE submitter_id = $1
            ORDER BY id
            ",
        )
        .bind(submitter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_internship_applications(
        &self,
        submitter_id: SubmitterId,
    ) -> Result<Vec<InternshipApplication>, RepositoryError> {
        let rows = sqlx::query_as::<_, InternshipApplicationRow>(
            r"
            SELECT id, submitter_id, phone, college, contact_method, domain,
                   linkedin_url, about_you, why_internship, resume_path,
                   resume_url, submitted_at
            FROM internship_application
            WHERE submitter_id = $1
            ORDER BY id
            ",
        )
        .bind(submitter_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn delete_child(
        &self,
        submitter_id: SubmitterId,
        child: ChildRef,
    ) -> Result<(), RepositoryError> {
        let query = match child {
            ChildRef::Contact(_) => {
                "DELETE FROM contact_inquiry WHERE id = $1 AND submitter_id = $2"
            }
            ChildRef::Internship(_) => {
                "DELETE FROM internship_application WHERE id = $1 AND submitter_id = $2"
            }
        };

        let result = sqlx::query(query)
            .bind(child.raw_id())
            .bind(submitter_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("child record already absent");
        }

        Ok(())
    }
}
