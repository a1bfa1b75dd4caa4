//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /login                                         - Sign-in page
//! GET  /auth/google                                   - Start Google sign-in
//! GET  /auth/callback                                 - Google redirect target
//! POST /logout                                        - Sign out
//! GET  /                                              - Load the dashboard (refetches)
//! GET  /tabs/{kind}                                   - Switch tab (htmx fragment or page)
//! POST /submissions/{submitter_id}/{kind}/{id}/accept - Accept & remove one record
//! GET  /export                                        - Download the workbook
//! GET  /resume?path=..&url=..                         - Open a résumé
//! GET  /storage/{*path}?expires=..&signature=..       - Signed object download
//! GET  /health, /health/ready                         - Probes
//! GET  /static/*                                      - Stylesheet and scripts
//! ```
//!
//! The router expects a `SessionManagerLayer` to be layered on by the caller.

pub mod auth;
pub mod dashboard;
pub mod files;
pub mod views;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::middleware::with_security_headers;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/login";

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Whether the request was issued by htmx.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Build the dashboard router.
pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route(LOGIN_PATH, get(auth::login_page))
        .route("/auth/google", get(auth::start))
        .route("/auth/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
        .route("/", get(dashboard::index))
        .route("/tabs/{kind}", get(dashboard::tab))
        .route(
            "/submissions/{submitter_id}/{kind}/{child_id}/accept",
            post(dashboard::accept),
        )
        .route("/export", get(dashboard::export))
        .route("/resume", get(files::open_resume))
        .route("/storage/{*path}", get(files::signed_object))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest_service("/static", ServeDir::new(STATIC_DIR));

    with_security_headers(router).with_state(state)
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
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use axum::response::Response;
    use chrono::Utc;
    use relyce_backend::ObjectStore;
    use relyce_backend::SubmissionStore;
    use relyce_backend::memory::{MemoryAdminUserStore, MemoryObjectStore, MemorySubmissionStore};
    use relyce_backend::storage::UrlSigner;
    use relyce_core::{
        AdminRole, ContactInquiry, ContactInquiryId, ContactMethod, Email, IdentityUid,
        SubmitterId,
    };
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};
    use url::Url;

    use super::*;
    use crate::routes::views::CONFIRM_ACCEPT;
    use crate::services::{DashboardCache, Identity, IdentityProvider, OAuthError};
    use crate::state::Backends;

    const ADMIN_UID: &str = "google-admin-1";

    struct FakeIdentity(Identity);

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        fn authorization_url(
            &self,
            redirect_uri: &str,
            state: &str,
            nonce: &str,
        ) -> Result<Url, OAuthError> {
            Ok(Url::parse_with_params(
                "https://idp.relyce.test/authorize",
                &[
                    ("redirect_uri", redirect_uri),
                    ("state", state),
                    ("nonce", nonce),
                ],
            )?)
        }

        async fn exchange(
            &self,
            code: &str,
            _redirect_uri: &str,
            _nonce: &str,
        ) -> Result<Identity, OAuthError> {
            if code == "good-code" {
                Ok(self.0.clone())
            } else {
                Err(OAuthError::TokenExchange("invalid_grant".to_owned()))
            }
        }
    }

    struct Harness {
        app: Router,
        submissions: Arc<MemorySubmissionStore>,
        admins: Arc<MemoryAdminUserStore>,
        objects: Arc<MemoryObjectStore>,
        signer: UrlSigner,
    }

    fn signer() -> UrlSigner {
        UrlSigner::new(
            SecretString::from("Qm4vT8xK2pR7wZ1nB5cY9dH3jL6sF0gA".to_string()),
            "http://admin.relyce.test",
            Duration::from_secs(600),
        )
        .unwrap()
    }

    fn harness(uid: &str) -> Harness {
        let submissions = Arc::new(MemorySubmissionStore::new());
        let admins = Arc::new(MemoryAdminUserStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let identity = Identity {
            uid: IdentityUid::new(uid),
            email: "ops@relyce.in".to_owned(),
        };
        let state = AppState::new(
            "http://admin.relyce.test/auth/callback".to_owned(),
            Backends {
                submissions: submissions.clone(),
                admins: admins.clone(),
                objects: objects.clone(),
                signer: signer(),
                identity: Arc::new(FakeIdentity(identity)),
            },
            DashboardCache::new(Duration::from_secs(60)),
        );
        let app = router(state).layer(SessionManagerLayer::new(MemoryStore::default()));
        Harness {
            app,
            submissions,
            admins,
            objects,
            signer: signer(),
        }
    }

    async fn with_contact(store: &MemorySubmissionStore) -> (SubmitterId, ContactInquiryId) {
        let email = Email::parse("arun@example.com").unwrap();
        let submitter_id = store.upsert_submitter("Arun Kumar", &email).await.unwrap();
        let id = ContactInquiryId::new(501);
        store.insert_contact(ContactInquiry {
            id,
            submitter_id,
            phone: "9876543210".to_owned(),
            company: "Kumar Textiles".to_owned(),
            contact_method: ContactMethod::Email,
            project_details: "An online catalogue".to_owned(),
            requirements: "Product pages".to_owned(),
            submitted_at: Some(Utc::now()),
        });
        (submitter_id, id)
    }

    fn request(method: &str, uri: &str, cookie: Option<&str>, htmx: bool) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        builder.body(Body::empty()).unwrap()
    }

    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned)
    }

    fn location(response: &Response) -> String {
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_owned()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Run the sign-in round trip and return the callback response and the
    /// session cookie to send afterwards.
    async fn sign_in(app: &Router, code: &str) -> (Response, String) {
        let start = app
            .clone()
            .oneshot(request("GET", "/auth/google", None, false))
            .await
            .unwrap();
        assert_eq!(start.status(), StatusCode::SEE_OTHER);
        let cookie = session_cookie(&start).unwrap();
        let authorize = Url::parse(&location(&start)).unwrap();
        let state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .unwrap();

        let callback = app
            .clone()
            .oneshot(request(
                "GET",
                &format!("/auth/callback?code={code}&state={state}"),
                Some(&cookie),
                false,
            ))
            .await
            .unwrap();
        let cookie = session_cookie(&callback).unwrap_or(cookie);
        (callback, cookie)
    }

    async fn signed_in_admin(harness: &Harness) -> String {
        harness
            .admins
            .insert(ADMIN_UID, "ops@relyce.in", AdminRole::Admin);
        let (callback, cookie) = sign_in(&harness.app, "good-code").await;
        assert_eq!(callback.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&callback), "/");
        cookie
    }

    #[tokio::test]
    async fn test_dashboard_requires_sign_in() {
        let harness = harness(ADMIN_UID);

        let page = harness
            .app
            .clone()
            .oneshot(request("GET", "/", None, false))
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&page), LOGIN_PATH);

        let fragment = harness
            .app
            .clone()
            .oneshot(request("GET", "/tabs/contact", None, true))
            .await
            .unwrap();
        assert_eq!(fragment.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(fragment.headers()["hx-redirect"], LOGIN_PATH);
        assert_eq!(harness.submissions.calls(), 0);
    }

    #[tokio::test]
    async fn test_admin_sees_submissions_after_sign_in() {
        let harness = harness(ADMIN_UID);
        with_contact(&harness.submissions).await;
        let cookie = signed_in_admin(&harness).await;

        let page = harness
            .app
            .clone()
            .oneshot(request("GET", "/", Some(&cookie), false))
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = body_text(page).await;
        assert!(html.contains("Arun Kumar"));
        assert!(html.contains("Kumar Textiles"));
        assert!(html.contains("ops@relyce.in"));
    }

    #[tokio::test]
    async fn test_unknown_identity_is_registered_and_refused() {
        let harness = harness("google-new-7");
        let (callback, _) = sign_in(&harness.app, "good-code").await;

        assert_eq!(callback.status(), StatusCode::FORBIDDEN);
        let html = body_text(callback).await;
        assert!(html.contains("Account created, but not authorized"));

        let users = harness.admins.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, AdminRole::User);
    }

    #[tokio::test]
    async fn test_failed_exchange_shows_login_error() {
        let harness = harness(ADMIN_UID);
        harness
            .admins
            .insert(ADMIN_UID, "ops@relyce.in", AdminRole::Admin);
        let (callback, cookie) = sign_in(&harness.app, "bad-code").await;

        assert_eq!(callback.status(), StatusCode::FORBIDDEN);
        assert!(body_text(callback).await.contains("Sign-in failed"));

        let page = harness
            .app
            .clone()
            .oneshot(request("GET", "/", Some(&cookie), false))
            .await
            .unwrap();
        assert_eq!(location(&page), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_callback_without_matching_state_is_refused() {
        let harness = harness(ADMIN_UID);
        let response = harness
            .app
            .clone()
            .oneshot(request(
                "GET",
                "/auth/callback?code=good-code&state=forged",
                None,
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_text(response).await.contains("Sign-in expired"));
        assert!(harness.admins.users().is_empty());
    }

    #[tokio::test]
    async fn test_accept_form_asks_for_confirmation_without_htmx() {
        let harness = harness(ADMIN_UID);
        let (submitter_id, id) = with_contact(&harness.submissions).await;
        let cookie = signed_in_admin(&harness).await;
        let page = harness
            .app
            .clone()
            .oneshot(request("GET", "/", Some(&cookie), false))
            .await
            .unwrap();
        let html = body_text(page).await;

        assert!(html.contains(r#"<script src="/static/admin.js" defer></script>"#));
        let form = format!(r#"action="/submissions/{submitter_id}/contact/{id}/accept""#);
        assert!(html.contains(&form));
        assert!(html.contains(&format!(r#"data-confirm="{CONFIRM_ACCEPT}""#)));

        let script = include_str!("../../static/admin.js");
        assert!(script.contains("form.dataset.confirm"));
        assert!(script.contains("window.confirm("));
        assert!(script.contains("event.preventDefault()"));
    }

    #[tokio::test]
    async fn test_accept_removes_record_from_store_and_view() {
        let harness = harness(ADMIN_UID);
        let (submitter_id, id) = with_contact(&harness.submissions).await;
        let cookie = signed_in_admin(&harness).await;
        harness
            .app
            .clone()
            .oneshot(request("GET", "/", Some(&cookie), false))
            .await
            .unwrap();

        let response = harness
            .app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/submissions/{submitter_id}/contact/{id}/accept"),
                Some(&cookie),
                true,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(!html.contains("Kumar Textiles"));
        assert!(!html.contains("<html"));
        assert!(harness.submissions.contact_inquiries().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_record_and_alerts() {
        let harness = harness(ADMIN_UID);
        let (submitter_id, id) = with_contact(&harness.submissions).await;
        let cookie = signed_in_admin(&harness).await;
        harness.submissions.fail_deletes();

        let response = harness
            .app
            .clone()
            .oneshot(request(
                "POST",
                &format!("/submissions/{submitter_id}/contact/{id}/accept"),
                Some(&cookie),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(response).await;
        assert!(html.contains("Failed to delete the application"));
        assert!(html.contains("Kumar Textiles"));
        assert_eq!(harness.submissions.contact_inquiries().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tab_is_not_found() {
        let harness = harness(ADMIN_UID);
        let cookie = signed_in_admin(&harness).await;
        let response = harness
            .app
            .clone()
            .oneshot(request("GET", "/tabs/newsletter", Some(&cookie), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_downloads_workbook() {
        let harness = harness(ADMIN_UID);
        with_contact(&harness.submissions).await;
        let cookie = signed_in_admin(&harness).await;

        let response = harness
            .app
            .clone()
            .oneshot(request("GET", "/export", Some(&cookie), false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Relyce_Users_Data.xlsx\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // xlsx is a zip archive
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_empty_export_shows_message() {
        let harness = harness(ADMIN_UID);
        let cookie = signed_in_admin(&harness).await;

        let response = harness
            .app
            .clone()
            .oneshot(request("GET", "/export?tab=internship", Some(&cookie), true))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("No data available to export."));
    }

    #[tokio::test]
    async fn test_resume_redirects_to_direct_link() {
        let harness = harness(ADMIN_UID);
        let cookie = signed_in_admin(&harness).await;
        let response = harness
            .app
            .clone()
            .oneshot(request(
                "GET",
                "/resume?url=https%3A%2F%2Fdrive.example.com%2Fcv.pdf",
                Some(&cookie),
                false,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "https://drive.example.com/cv.pdf");
    }

    #[tokio::test]
    async fn test_signed_object_download() {
        let harness = harness(ADMIN_UID);
        harness
            .objects
            .upload("resumes/7_cv.pdf", b"%PDF-1.4".to_vec(), "application/pdf")
            .await
            .unwrap();
        let link = harness.signer.sign("resumes/7_cv.pdf", Utc::now()).unwrap();
        let uri = format!("{}?{}", link.path(), link.query().unwrap());

        let response = harness
            .app
            .clone()
            .oneshot(request("GET", &uri, None, false))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(body_text(response).await, "%PDF-1.4");

        let tampered = harness
            .app
            .clone()
            .oneshot(request(
                "GET",
                &uri.replace("7_cv", "8_cv"),
                None,
                false,
            ))
            .await
            .unwrap();
        assert_eq!(tampered.status(), StatusCode::FORBIDDEN);

        let unsigned = harness
            .app
            .clone()
            .oneshot(request("GET", "/storage/resumes/7_cv.pdf", None, false))
            .await
            .unwrap();
        assert_eq!(unsigned.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_logout_ends_the_session() {
        let harness = harness(ADMIN_UID);
        let cookie = signed_in_admin(&harness).await;

        let response = harness
            .app
            .clone()
            .oneshot(request("POST", "/logout", Some(&cookie), false))
            .await
            .unwrap();
        assert_eq!(location(&response), LOGIN_PATH);

        let page = harness
            .app
            .clone()
            .oneshot(request("GET", "/", Some(&cookie), false))
            .await
            .unwrap();
        assert_eq!(location(&page), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_probes_and_headers() {
        let harness = harness(ADMIN_UID);
        let health = harness
            .app
            .clone()
            .oneshot(request("GET", "/health", None, false))
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(health.headers()["x-frame-options"], "DENY");

        let ready = harness
            .app
            .clone()
            .oneshot(request("GET", "/health/ready", None, false))
            .await
            .unwrap();
        assert_eq!(ready.status(), StatusCode::OK);
    }
}
