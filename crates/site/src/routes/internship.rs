//! Internship application handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use relyce_core::{
    ContactMethod, FieldErrors, InternshipDomain, InternshipForm, ResumeError, ResumeFile,
};

use super::{Notice, SelectOption, select_options};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::services::{IngestError, submit_internship};
use crate::state::AppState;

pub const SUCCESS_MESSAGE: &str = "Application submitted successfully.";

/// Multipart field carrying the résumé file.
pub const RESUME_FIELD: &str = "resume";

#[derive(Template, WebTemplate)]
#[template(path = "internship_form.html")]
pub struct InternshipFormTemplate {
    pub form: InternshipForm,
    pub errors: FieldErrors,
    pub resume_error: Option<ResumeError>,
    pub methods: Vec<SelectOption>,
    pub domains: Vec<SelectOption>,
    pub notice: Option<Notice>,
}

impl InternshipFormTemplate {
    fn new(
        form: InternshipForm,
        errors: FieldErrors,
        resume_error: Option<ResumeError>,
        notice: Option<Notice>,
    ) -> Self {
        let methods = select_options(
            ContactMethod::ALL.map(ContactMethod::as_str),
            &form.contact_method,
        );
        let domains = select_options(
            InternshipDomain::ALL.map(InternshipDomain::as_str),
            &form.domain,
        );
        Self {
            form,
            errors,
            resume_error,
            methods,
            domains,
            notice,
        }
    }

    fn blank() -> Self {
        Self::new(InternshipForm::default(), FieldErrors::default(), None, None)
    }
}

/// Text fields and the optional résumé read from a multipart body.
#[derive(Debug, Default)]
struct MultipartSubmission {
    form: InternshipForm,
    resume: Option<ResumeFile>,
}

impl MultipartSubmission {
    fn set_text(&mut self, name: &str, value: String) {
        let form = &mut self.form;
        let slot = match name {
            "email" => &mut form.email,
            "full_name" => &mut form.full_name,
            "college" => &mut form.college,
            "phone" => &mut form.phone,
            "contact_method" => &mut form.contact_method,
            "domain" => &mut form.domain,
            "linkedin" => &mut form.linkedin,
            "about_you" => &mut form.about_you,
            "why_internship" => &mut form.why_internship,
            _ => return,
        };
        *slot = value;
    }
}

/// Read every field. On error, whatever was read before it is returned
/// alongside the error so the form can be re-rendered.
async fn read_multipart(
    mut multipart: Multipart,
) -> (MultipartSubmission, Option<MultipartError>) {
    let mut submission = MultipartSubmission::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return (submission, None),
            Err(e) => return (submission, Some(e)),
        };
        let name = field.name().unwrap_or_default().to_owned();

        if name == RESUME_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let content_type = field.content_type().unwrap_or_default().to_owned();
            match field.bytes().await {
                Ok(bytes) => {
                    submission.resume = Some(ResumeFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                Err(e) => return (submission, Some(e)),
            }
        } else {
            match field.text().await {
                Ok(value) => submission.set_text(&name, value),
                Err(e) => return (submission, Some(e)),
            }
        }
    }
}

/// GET /internship
#[instrument]
pub async fn show() -> InternshipFormTemplate {
    InternshipFormTemplate::blank()
}

/// POST /internship
///
/// A body cut off by the size limit is reported as an oversized résumé.
#[instrument(skip_all)]
pub async fn submit(State(state): State<AppState>, multipart: Multipart) -> impl IntoResponse {
    add_breadcrumb("form", "internship application submitted");

    let (MultipartSubmission { form, resume }, read_error) = read_multipart(multipart).await;

    if let Some(e) = read_error {
        let status = e.status();
        tracing::warn!(error = %e, status = %status, "Unreadable internship upload");
        let resume_error =
            (status == StatusCode::PAYLOAD_TOO_LARGE).then_some(ResumeError::TooLarge);
        let notice = resume_error.is_none().then(Notice::failure);
        return (
            if resume_error.is_some() {
                StatusCode::PAYLOAD_TOO_LARGE
            } else {
                StatusCode::BAD_REQUEST
            },
            InternshipFormTemplate::new(form, FieldErrors::default(), resume_error, notice),
        );
    }

    match submit_internship(state.submissions(), state.objects(), &form, resume).await {
        Ok(_) => (
            StatusCode::OK,
            InternshipFormTemplate::new(
                InternshipForm::default(),
                FieldErrors::default(),
                None,
                Some(Notice::success(SUCCESS_MESSAGE)),
            ),
        ),
        Err(IngestError::Invalid { fields, resume }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            InternshipFormTemplate::new(form, fields, resume, None),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Internship submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                InternshipFormTemplate::new(
                    form,
                    FieldErrors::default(),
                    None,
                    Some(Notice::failure()),
                ),
            )
        }
    }
}
