//! Static marketing pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::content::{
    CONTACT, ContactDetails, FAQ, FaqCategory, JOURNEY, Milestone, PROCESS, SERVICES, Service,
    TEAM, TeamMember,
};
use crate::filters;

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub services: &'static [Service],
}

#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub journey: &'static [Milestone],
    pub process: &'static [Milestone],
    pub team: &'static [TeamMember],
}

#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub services: &'static [Service],
}

#[derive(Template, WebTemplate)]
#[template(path = "faq.html")]
pub struct FaqTemplate {
    pub categories: &'static [FaqCategory],
}

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub contact: &'static ContactDetails,
}

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

#[instrument]
pub async fn home() -> HomeTemplate {
    HomeTemplate { services: SERVICES }
}

#[instrument]
pub async fn about() -> AboutTemplate {
    AboutTemplate {
        journey: JOURNEY,
        process: PROCESS,
        team: TEAM,
    }
}

#[instrument]
pub async fn services() -> ServicesTemplate {
    ServicesTemplate { services: SERVICES }
}

#[instrument]
pub async fn faq() -> FaqTemplate {
    FaqTemplate { categories: FAQ }
}

#[instrument]
pub async fn contact() -> ContactTemplate {
    ContactTemplate { contact: &CONTACT }
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}
