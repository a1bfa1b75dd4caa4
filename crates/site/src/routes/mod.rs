//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /, /home          - Landing page
//! GET  /about            - About page
//! GET  /services         - Services page
//! GET  /faq              - Categorized FAQ
//! GET  /contact          - Contact details
//! GET  /contactus        - Contact form
//! POST /contactus        - Submit contact form (rate limited)
//! GET  /internship       - Internship application form
//! POST /internship       - Submit application, multipart (rate limited)
//! GET  /health           - Liveness probe
//! GET  /health/ready     - Readiness probe
//! GET  /static/*         - Stylesheet and images
//! *                      - 404 page
//! ```

pub mod contact;
pub mod internship;
pub mod pages;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::middleware::{form_rate_limiter, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/site/static";

/// Multipart bodies above this are cut off before the résumé size check.
pub const MAX_MULTIPART_BYTES: usize = 10 * 1024 * 1024;

/// One-line banner shown above a form after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub success: bool,
    pub message: &'static str,
}

impl Notice {
    pub const FAILURE_MESSAGE: &'static str = "Something went wrong. Please try again.";

    #[must_use]
    pub const fn success(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }

    #[must_use]
    pub const fn failure() -> Self {
        Self {
            success: false,
            message: Self::FAILURE_MESSAGE,
        }
    }
}

/// An `<option>` in a form select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Build select options from labels, marking the one matching `current`.
pub fn select_options(
    labels: impl IntoIterator<Item = &'static str>,
    current: &str,
) -> Vec<SelectOption> {
    labels
        .into_iter()
        .map(|value| SelectOption {
            value,
            selected: value == current,
        })
        .collect()
}

/// Build the full site router, including probes, static files and the
/// 404 fallback.
pub fn router(state: AppState) -> Router {
    let limiter = form_rate_limiter();

    Router::new()
        .route("/", get(pages::home))
        .route("/home", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/faq", get(pages::faq))
        .route("/contact", get(pages::contact))
        .route(
            "/contactus",
            get(contact::show).merge(post(contact::submit).layer(limiter.clone())),
        )
        .route(
            "/internship",
            get(internship::show).merge(
                post(internship::submit)
                    .layer::<_, std::convert::Infallible>(limiter)
                    .layer(DefaultBodyLimit::max(MAX_MULTIPART_BYTES)),
            ),
        )
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(pages::not_found)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Liveness probe. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: 503 when the document store is unreachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.submissions().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use relyce_backend::memory::{MemoryObjectStore, MemorySubmissionStore};
    use tower::ServiceExt;

    use super::*;

    const CLIENT_IP: &str = "203.0.113.10";
    const BOUNDARY: &str = "relyce-test-boundary";

    fn app() -> (Router, Arc<MemorySubmissionStore>, Arc<MemoryObjectStore>) {
        let store = Arc::new(MemorySubmissionStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let app = router(AppState::new(store.clone(), objects.clone()));
        (app, store, objects)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn contact_post(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/contactus")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::from(body))
            .unwrap()
    }

    const VALID_CONTACT: &str = "full_name=Arun+Kumar&email=arun%40example.com\
        &company=Kumar+Textiles&phone=9876543210&contact_method=WhatsApp\
        &project_details=An+online+catalogue&requirements=Product+pages+and+enquiries";

    fn multipart_body(fields: &[(&str, &str)], resume: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
                     filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn internship_post(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/internship")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::from(body))
            .unwrap()
    }

    const INTERNSHIP_FIELDS: [(&str, &str); 9] = [
        ("email", "meera@college.edu"),
        ("full_name", "Meera S"),
        ("college", "Anna University"),
        ("phone", "9123456780"),
        ("contact_method", "Email"),
        ("domain", "AI Engineer"),
        ("linkedin", "https://www.linkedin.com/in/meera"),
        ("about_you", "Final year student who enjoys ML"),
        ("why_internship", "To ship real production systems"),
    ];

    #[tokio::test]
    async fn test_pages_render() {
        let uris = [
            "/", "/home", "/about", "/services", "/faq", "/contact", "/contactus", "/internship",
        ];
        for uri in uris {
            let (app, _, _) = app();
            let response = app.oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_page() {
        let (app, _, _) = app();
        let response = app.oneshot(get("/pricing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("does not exist"));
    }

    #[tokio::test]
    async fn test_responses_carry_request_id_and_security_headers() {
        let (app, _, _) = app();
        let response = app.oneshot(get("/")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_probes() {
        let (app, _, _) = app();
        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(body_text(response).await, "ok");
        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_contact_success_clears_form() {
        let (app, store, _) = app();
        let response = app.oneshot(contact_post(VALID_CONTACT)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Submitted successfully."));
        assert!(!html.contains("Kumar Textiles"));
        assert_eq!(store.contact_inquiries().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_validation_keeps_values() {
        let (app, store, _) = app();
        let response = app
            .oneshot(contact_post(
                "full_name=Arun&email=not-an-email&company=Kumar+Textiles&phone=123",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_text(response).await;
        assert!(html.contains("Please enter a valid email"));
        assert!(html.contains("Please enter a valid phone number"));
        assert!(html.contains("Kumar Textiles"));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_contact_backend_failure_keeps_values() {
        let (app, store, _) = app();
        store.fail_upserts();
        let response = app.oneshot(contact_post(VALID_CONTACT)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let html = body_text(response).await;
        assert!(html.contains(Notice::FAILURE_MESSAGE));
        assert!(html.contains("Kumar Textiles"));
    }

    #[tokio::test]
    async fn test_form_posts_are_rate_limited() {
        let (app, _, _) = app();
        let mut last = StatusCode::OK;
        for _ in 0..6 {
            last = app
                .clone()
                .oneshot(contact_post("full_name="))
                .await
                .unwrap()
                .status();
        }
        assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_internship_upload_stores_resume() {
        let (app, store, objects) = app();
        let body = multipart_body(
            &INTERNSHIP_FIELDS,
            Some(("Meera CV.pdf", "application/pdf", b"%PDF-1.7 test")),
        );
        let response = app.oneshot(internship_post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(internship::SUCCESS_MESSAGE));

        let paths = objects.paths();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("_Meera_CV.pdf"));
        let applications = store.internship_applications();
        assert_eq!(applications.len(), 1);
        assert_eq!(applications[0].resume_path.as_deref(), Some(paths[0].as_str()));
    }

    #[tokio::test]
    async fn test_internship_rejects_non_pdf() {
        let (app, store, objects) = app();
        let body = multipart_body(
            &INTERNSHIP_FIELDS,
            Some(("cv.docx", "application/msword", b"not a pdf")),
        );
        let response = app.oneshot(internship_post(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_text(response).await;
        assert!(html.contains("Only PDF files are accepted."));
        assert!(html.contains("Anna University"));
        assert_eq!(objects.calls(), 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_internship_requires_resume() {
        let (app, _, objects) = app();
        let response = app
            .oneshot(internship_post(multipart_body(&INTERNSHIP_FIELDS, None)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(
            body_text(response)
                .await
                .contains("Please upload your resume (PDF only)")
        );
        assert_eq!(objects.calls(), 0);
    }

    #[test]
    fn test_select_options_marks_current() {
        let options = select_options(["Email", "Phone", "WhatsApp"], "Phone");
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "Phone");
    }

    #[test]
    fn test_select_options_without_match() {
        let options = select_options(["Email", "Phone"], "");
        assert!(options.iter().all(|o| !o.selected));
    }
}
