//! Authentication extractors for admin.
//!
//! Every dashboard route takes [`RequireAdmin`]; the landing page takes
//! [`OptionalAdmin`] so it can tell a signed-out visitor apart from a failed
//! load.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};
use crate::routes::{LOGIN_PATH, is_htmx};

/// Extractor that requires a signed-in admin.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Error returned when a signed-in admin is required.
pub enum AdminAuthRejection {
    /// Redirect to login page (for full page loads).
    RedirectToLogin,
    /// htmx requests get a 401 telling htmx where to go.
    HtmxRedirect,
    /// No session layer in front of the router.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::HtmxRedirect => (
                StatusCode::UNAUTHORIZED,
                [("hx-redirect", HeaderValue::from_static(LOGIN_PATH))],
            )
                .into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    match session.get::<CurrentAdmin>(session_keys::CURRENT_ADMIN).await {
        Ok(admin) => admin,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable admin session");
            None
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::MissingSession)?;

        current_admin(session).await.map(Self).ok_or_else(|| {
            if is_htmx(&parts.headers) {
                AdminAuthRejection::HtmxRedirect
            } else {
                AdminAuthRejection::RedirectToLogin
            }
        })
    }
}

/// Extractor that optionally gets the current admin.
pub struct OptionalAdmin(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdmin
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Drop everything in the session, signing the admin out.
pub async fn clear_session(session: &Session) {
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to flush session");
    }
}
