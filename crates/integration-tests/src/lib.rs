//! Shared harness for the cross-crate tests.
//!
//! Both routers run in-process against one set of in-memory backends, so a
//! form posted to the site is what the dashboard reads back.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p relyce-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use relyce_admin::services::{DashboardCache, Identity, IdentityProvider, OAuthError};
use relyce_backend::memory::{MemoryAdminUserStore, MemoryObjectStore, MemorySubmissionStore};
use relyce_backend::storage::UrlSigner;
use relyce_core::{AdminRole, IdentityUid};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use url::Url;

pub const ADMIN_UID: &str = "google-ops-1";
pub const ADMIN_EMAIL: &str = "ops@relyce.in";
pub const CLIENT_IP: &str = "198.51.100.24";
const BOUNDARY: &str = "relyce-integration-boundary";

/// Identity provider that signs everyone in as one fixed identity.
struct FixedIdentity(Identity);

#[async_trait]
impl IdentityProvider for FixedIdentity {
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
        _code: &str,
        _redirect_uri: &str,
        _nonce: &str,
    ) -> Result<Identity, OAuthError> {
        Ok(self.0.clone())
    }
}

/// The public site and the dashboard over shared backends.
pub struct TestContext {
    pub site: Router,
    pub admin: Router,
    pub submissions: Arc<MemorySubmissionStore>,
    pub admins: Arc<MemoryAdminUserStore>,
    pub objects: Arc<MemoryObjectStore>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let submissions = Arc::new(MemorySubmissionStore::new());
        let admins = Arc::new(MemoryAdminUserStore::new());
        let objects = Arc::new(MemoryObjectStore::new());

        let site = relyce_site::router(relyce_site::AppState::new(
            submissions.clone(),
            objects.clone(),
        ));

        let signer = UrlSigner::new(
            SecretString::from("Xr7kP2mW9qT4vB1nC6yH3jL8sD5fG0zA".to_string()),
            "http://admin.relyce.test",
            Duration::from_secs(600),
        )
        .unwrap();
        let state = relyce_admin::AppState::new(
            "http://admin.relyce.test/auth/callback".to_owned(),
            relyce_admin::Backends {
                submissions: submissions.clone(),
                admins: admins.clone(),
                objects: objects.clone(),
                signer,
                identity: Arc::new(FixedIdentity(Identity {
                    uid: IdentityUid::new(ADMIN_UID),
                    email: ADMIN_EMAIL.to_owned(),
                })),
            },
            DashboardCache::new(Duration::from_secs(60)),
        );
        let admin = relyce_admin::router(state)
            .layer(SessionManagerLayer::new(MemoryStore::default()));

        Self {
            site,
            admin,
            submissions,
            admins,
            objects,
        }
    }

    /// Allow-list the fixed identity as an admin and sign in. Returns the
    /// session cookie.
    pub async fn sign_in_admin(&self) -> String {
        self.admins.insert(ADMIN_UID, ADMIN_EMAIL, AdminRole::Admin);

        let start = self.admin_request("GET", "/auth/google", None, false).await;
        let cookie = session_cookie(&start).unwrap();
        let authorize = Url::parse(start.headers()[header::LOCATION].to_str().unwrap()).unwrap();
        let state = authorize
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .unwrap();

        let callback = self
            .admin_request(
                "GET",
                &format!("/auth/callback?code=ok&state={state}"),
                Some(&cookie),
                false,
            )
            .await;
        assert_eq!(callback.status(), StatusCode::SEE_OTHER);
        session_cookie(&callback).unwrap_or(cookie)
    }

    pub async fn admin_request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        htmx: bool,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        self.admin
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Post the contact form with the given url-encoded body.
    pub async fn submit_contact(&self, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri("/contactus")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.site.clone().oneshot(request).await.unwrap()
    }

    /// Post the internship form with a PDF résumé.
    pub async fn submit_internship(&self, fields: &[(&str, &str)], resume: &[u8]) -> Response {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
                 filename=\"cv.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(resume);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/internship")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("x-forwarded-for", CLIENT_IP)
            .body(Body::from(body))
            .unwrap();
        self.site.clone().oneshot(request).await.unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[must_use]
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
