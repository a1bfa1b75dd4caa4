//! Submission ingestion for the contact and internship forms.
//!
//! Each flow validates locally first; nothing reaches a store until every
//! check has passed. The internship flow uploads the résumé before writing
//! any record, and a record-write failure after a successful upload leaves
//! the object in storage.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use relyce_backend::{ObjectStore, RepositoryError, StorageError, SubmissionStore};
use relyce_core::{
    ContactForm, ContactInquiryId, FieldErrors, InternshipApplicationId, InternshipForm,
    ResumeError, ResumeFile, check_resume, resume_object_path,
};

#[derive(Debug, Error)]
pub enum IngestError {
    /// Local validation failed; no backend call was made.
    #[error("form has {} invalid field(s)", fields.len() + usize::from(resume.is_some()))]
    Invalid {
        fields: FieldErrors,
        resume: Option<ResumeError>,
    },

    /// The résumé upload failed; nothing was written to the database.
    #[error("resume upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("database write failed: {0}")]
    Database(#[from] RepositoryError),
}

impl IngestError {
    fn invalid(fields: FieldErrors) -> Self {
        Self::Invalid {
            fields,
            resume: None,
        }
    }
}

/// Record a contact inquiry under its submitter.
///
/// # Errors
///
/// Returns `IngestError::Invalid` without touching the store if the form
/// fails validation, otherwise any store failure.
#[instrument(skip_all)]
pub async fn submit_contact(
    store: &dyn SubmissionStore,
    form: &ContactForm,
) -> Result<ContactInquiryId, IngestError> {
    let submission = form.validate().map_err(IngestError::invalid)?;

    let submitter_id = store
        .upsert_submitter(&submission.full_name, &submission.email)
        .await?;
    let inquiry_id = store
        .create_contact_inquiry(submitter_id, &submission)
        .await?;

    tracing::info!(
        submitter_id = %submitter_id,
        inquiry_id = %inquiry_id,
        contact_method = %submission.contact_method,
        "Contact inquiry recorded"
    );
    Ok(inquiry_id)
}

/// Upload a résumé and record the internship application that references it.
///
/// # Errors
///
/// Returns `IngestError::Invalid` without touching either store if the form
/// or the résumé fails its checks, `IngestError::Upload` if the upload fails
/// (no records written), or `IngestError::Database` if a record write fails
/// after the upload.
#[instrument(skip_all)]
pub async fn submit_internship(
    store: &dyn SubmissionStore,
    objects: &dyn ObjectStore,
    form: &InternshipForm,
    resume: Option<ResumeFile>,
) -> Result<InternshipApplicationId, IngestError> {
    let validated = form.validate();
    let resume_error = check_resume(resume.as_ref()).err();

    let submission = match (validated, resume_error) {
        (Ok(submission), None) => submission,
        (validated, resume_error) => {
            return Err(IngestError::Invalid {
                fields: validated.err().unwrap_or_default(),
                resume: resume_error,
            });
        }
    };
    let Some(resume) = resume else {
        return Err(IngestError::Invalid {
            fields: FieldErrors::default(),
            resume: Some(ResumeError::Missing),
        });
    };

    let path = resume_object_path(Utc::now().timestamp_millis(), &resume.file_name);
    let stored = objects
        .upload(&path, resume.bytes, &resume.content_type)
        .await?;
    tracing::info!(path = %stored.path, "Resume uploaded");

    let submitter_id = store
        .upsert_submitter(&submission.full_name, &submission.email)
        .await
        .inspect_err(|e| {
            tracing::warn!(path = %stored.path, error = %e, "Resume stored without a record");
        })?;
    let application_id = store
        .create_internship_application(submitter_id, &submission, &stored.path)
        .await
        .inspect_err(|e| {
            tracing::warn!(path = %stored.path, error = %e, "Resume stored without a record");
        })?;

    tracing::info!(
        submitter_id = %submitter_id,
        application_id = %application_id,
        domain = %submission.domain,
        "Internship application recorded"
    );
    Ok(application_id)
}
