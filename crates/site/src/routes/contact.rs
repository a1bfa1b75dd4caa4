//! Contact form handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use relyce_core::{ContactForm, ContactMethod, FieldErrors};

use super::{Notice, SelectOption, select_options};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::services::{IngestError, submit_contact};
use crate::state::AppState;

pub const SUCCESS_MESSAGE: &str = "Submitted successfully. We'll be in touch soon.";

#[derive(Template, WebTemplate)]
#[template(path = "contact_form.html")]
pub struct ContactFormTemplate {
    pub form: ContactForm,
    pub errors: FieldErrors,
    pub methods: Vec<SelectOption>,
    pub notice: Option<Notice>,
}

impl ContactFormTemplate {
    fn new(form: ContactForm, errors: FieldErrors, notice: Option<Notice>) -> Self {
        let methods = select_options(
            ContactMethod::ALL.map(ContactMethod::as_str),
            &form.contact_method,
        );
        Self {
            form,
            errors,
            methods,
            notice,
        }
    }
}

/// GET /contactus
#[instrument]
pub async fn show() -> ContactFormTemplate {
    ContactFormTemplate::new(ContactForm::default(), FieldErrors::default(), None)
}

/// POST /contactus
///
/// Success renders an empty form with the success banner. Validation errors
/// and backend failures keep every typed value.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    add_breadcrumb("form", "contact form submitted");

    match submit_contact(state.submissions(), &form).await {
        Ok(_) => (
            StatusCode::OK,
            ContactFormTemplate::new(
                ContactForm::default(),
                FieldErrors::default(),
                Some(Notice::success(SUCCESS_MESSAGE)),
            ),
        ),
        Err(IngestError::Invalid { fields, .. }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactFormTemplate::new(form, fields, None),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Contact submission failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactFormTemplate::new(form, FieldErrors::default(), Some(Notice::failure())),
            )
        }
    }
}
