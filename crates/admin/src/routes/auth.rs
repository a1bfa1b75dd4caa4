//! Google sign-in and sign-out handlers.
//!
//! Any refusal (unknown identity, non-admin role, store error, failed
//! exchange) clears the session and renders the login page with the reason.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAdmin, clear_session, set_current_admin};
use crate::models::{CurrentAdmin, session_keys};
use crate::routes::LOGIN_PATH;
use crate::routes::views::LoginTemplate;
use crate::services::gate::NOT_ADMIN_MESSAGE;
use crate::services::oauth::generate_random_string;
use crate::services::{GateOutcome, authorize};
use crate::state::AppState;

pub const SIGN_IN_FAILED_MESSAGE: &str = "Sign-in failed. Please try again.";
pub const SIGN_IN_EXPIRED_MESSAGE: &str = "Sign-in expired. Please try again.";

/// Length of the CSRF state and nonce.
const OAUTH_TOKEN_LENGTH: usize = 32;

/// Query parameters from the Google callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Clear the session and the cached dashboard for `admin`.
pub async fn sign_out(state: &AppState, session: &Session, admin: Option<&CurrentAdmin>) {
    if let Some(admin) = admin {
        state.dashboards().remove(&admin.cache_key).await;
    }
    clear_session(session).await;
    clear_sentry_user();
}

/// Sign out and show `message` on the login page.
pub async fn refuse(
    state: &AppState,
    session: &Session,
    admin: Option<&CurrentAdmin>,
    message: impl Into<String>,
) -> Response {
    sign_out(state, session, admin).await;
    (StatusCode::FORBIDDEN, LoginTemplate::with_message(message)).into_response()
}

/// GET /login
pub async fn login_page(OptionalAdmin(admin): OptionalAdmin) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate::blank().into_response()
}

/// GET /auth/google
///
/// Stores a fresh state and nonce in the session and redirects to Google.
#[instrument(skip_all)]
pub async fn start(State(state): State<AppState>, session: Session) -> Response {
    let oauth_state = generate_random_string(OAUTH_TOKEN_LENGTH);
    let nonce = generate_random_string(OAUTH_TOKEN_LENGTH);

    if let Err(e) = session.insert(session_keys::OAUTH_STATE, &oauth_state).await {
        tracing::error!(error = %e, "Failed to store OAuth state");
        return refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await;
    }
    if let Err(e) = session.insert(session_keys::OAUTH_NONCE, &nonce).await {
        tracing::error!(error = %e, "Failed to store OAuth nonce");
        return refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await;
    }

    match state
        .identity()
        .authorization_url(state.oauth_redirect_uri(), &oauth_state, &nonce)
    {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build authorization URL");
            refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await
        }
    }
}

async fn take(session: &Session, key: &str) -> Option<String> {
    session.remove::<String>(key).await.ok().flatten()
}

/// GET /auth/callback
///
/// Verifies the state, exchanges the code, and runs the identity through
/// the authorization gate.
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let expected_state = take(&session, session_keys::OAUTH_STATE).await;
    let nonce = take(&session, session_keys::OAUTH_NONCE).await;

    if let Some(error) = query.error {
        tracing::warn!(
            error = %error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "Google returned an error"
        );
        return refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await;
    }

    let (Some(code), Some(nonce)) = (query.code, nonce) else {
        return refuse(&state, &session, None, SIGN_IN_EXPIRED_MESSAGE).await;
    };
    if query.state.is_none() || query.state != expected_state {
        tracing::warn!("OAuth state mismatch");
        return refuse(&state, &session, None, SIGN_IN_EXPIRED_MESSAGE).await;
    }

    let identity = match state
        .identity()
        .exchange(&code, state.oauth_redirect_uri(), &nonce)
        .await
    {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!(error = %e, "Code exchange failed");
            return refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await;
        }
    };

    match authorize(state.admins(), &identity).await {
        Ok(GateOutcome::Admitted(admin)) => {
            // New session id on privilege change
            if let Err(e) = session.cycle_id().await {
                tracing::error!(error = %e, "Failed to cycle session id");
                return refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await;
            }
            if let Err(e) = set_current_admin(&session, &admin).await {
                tracing::error!(error = %e, "Failed to store admin in session");
                return refuse(&state, &session, None, SIGN_IN_FAILED_MESSAGE).await;
            }
            set_sentry_user(admin.uid.as_str(), &admin.email);
            Redirect::to("/").into_response()
        }
        Ok(outcome) => {
            let message = outcome
                .refusal_message()
                .unwrap_or_else(|| NOT_ADMIN_MESSAGE.to_owned());
            refuse(&state, &session, None, message).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Authorization gate failed");
            refuse(&state, &session, None, e.to_string()).await
        }
    }
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    OptionalAdmin(admin): OptionalAdmin,
) -> Response {
    sign_out(&state, &session, admin.as_ref()).await;
    Redirect::to(LOGIN_PATH).into_response()
}
