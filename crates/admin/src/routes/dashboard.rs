//! Dashboard handlers: page load, tabs, accept & remove, export.
//!
//! Only `GET /` refetches. Every other handler works on the session's
//! cached state and reloads it only when the cache entry is gone.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use relyce_core::{ChildKind, ChildRef, SubmitterId};

use super::auth::refuse;
use super::views::{DashboardTemplate, TabPanel, TabTemplate};
use super::{LOGIN_PATH, is_htmx};
use crate::error::AppError;
use crate::middleware::{OptionalAdmin, RequireAdmin};
use crate::models::CurrentAdmin;
use crate::services::cache::SharedDashboard;
use crate::services::dashboard::{self, DashboardState, DashboardStatus};
use crate::services::export::{self as exporter, ExportError};
use crate::services::gate::NOT_ADMIN_MESSAGE;
use crate::state::AppState;

pub const DELETE_FAILED_MESSAGE: &str =
    "Failed to delete the application. Make sure you have admin permissions.";

/// Run a fresh load and cache the result for the session.
async fn reload(
    state: &AppState,
    session: &Session,
    admin: Option<&CurrentAdmin>,
) -> Result<SharedDashboard, Response> {
    let status = dashboard::load(state.submissions(), state.admins(), admin).await;
    match (status, admin) {
        (DashboardStatus::Ready(loaded), Some(admin)) => {
            Ok(state.dashboards().store(&admin.cache_key, loaded).await)
        }
        (DashboardStatus::Error(message), Some(admin)) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            DashboardTemplate::failed(admin, message),
        )
            .into_response()),
        (DashboardStatus::Unauthorized, _) => {
            Err(refuse(state, session, admin, NOT_ADMIN_MESSAGE).await)
        }
        _ => Err(Redirect::to(LOGIN_PATH).into_response()),
    }
}

/// The session's cached state, reloading on a miss.
async fn cached(
    state: &AppState,
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<SharedDashboard, Response> {
    match state.dashboards().get(&admin.cache_key).await {
        Some(shared) => Ok(shared),
        None => {
            tracing::info!(uid = %admin.uid, "Dashboard cache miss, reloading");
            reload(state, session, Some(admin)).await
        }
    }
}

/// Fragment for htmx, full page otherwise.
fn render_tab(
    headers: &HeaderMap,
    admin: &CurrentAdmin,
    current: &DashboardState,
    kind: ChildKind,
    alert: Option<String>,
) -> Response {
    let panel = TabPanel::new(current, kind, alert);
    if is_htmx(headers) {
        TabTemplate { panel }.into_response()
    } else {
        DashboardTemplate::ready(admin, panel).into_response()
    }
}

fn tab_path(kind: ChildKind) -> String {
    format!("/tabs/{kind}")
}

fn parse_kind(kind: &str) -> Result<ChildKind, AppError> {
    kind.parse()
        .map_err(|_| AppError::NotFound(format!("collection {kind}")))
}

/// GET /
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    OptionalAdmin(admin): OptionalAdmin,
) -> Response {
    let shared = match reload(&state, &session, admin.as_ref()).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };
    let Some(admin) = admin else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    let current = shared.read().await;
    render_tab(&headers, &admin, &current, ChildKind::Contact, None)
}

/// GET /tabs/{kind}
#[instrument(skip_all, fields(kind = %kind))]
pub async fn tab(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    RequireAdmin(admin): RequireAdmin,
    Path(kind): Path<String>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let shared = match cached(&state, &session, &admin).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };
    let current = shared.read().await;
    render_tab(&headers, &admin, &current, kind, None)
}

/// POST /submissions/{submitter_id}/{kind}/{child_id}/accept
///
/// Deletes the record, then removes it from the cached state. A failed
/// delete leaves the cached state untouched.
#[instrument(skip_all, fields(submitter_id, kind = %kind, child_id))]
pub async fn accept(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    RequireAdmin(admin): RequireAdmin,
    Path((submitter_id, kind, child_id)): Path<(i32, String, i32)>,
) -> Response {
    tracing::Span::current()
        .record("submitter_id", submitter_id)
        .record("child_id", child_id);

    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return e.into_response(),
    };
    let submitter_id = SubmitterId::new(submitter_id);
    let child = ChildRef::new(kind, child_id);

    let shared = match cached(&state, &session, &admin).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    match state.submissions().delete_child(submitter_id, child).await {
        Ok(()) => {
            let mut current = shared.write().await;
            current.remove_child(submitter_id, child);
            tracing::info!(uid = %admin.uid, "Accepted and removed record");
            if is_htmx(&headers) {
                render_tab(&headers, &admin, &current, kind, None)
            } else {
                Redirect::to(&tab_path(kind)).into_response()
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Delete failed");
            let current = shared.read().await;
            let response = render_tab(
                &headers,
                &admin,
                &current,
                kind,
                Some(DELETE_FAILED_MESSAGE.to_owned()),
            );
            // htmx only swaps successful responses
            if is_htmx(&headers) {
                response
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, response).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Tab to return to when there is nothing to export.
    pub tab: Option<String>,
}

/// GET /export
#[instrument(skip_all)]
pub async fn export(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<ExportQuery>,
) -> Response {
    let shared = match cached(&state, &session, &admin).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };
    let current = shared.read().await;

    match exporter::export(&current) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, exporter::CONTENT_TYPE.to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", exporter::FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(ExportError::Empty) => {
            let kind = query
                .tab
                .as_deref()
                .and_then(|tab| tab.parse().ok())
                .unwrap_or_default();
            render_tab(
                &headers,
                &admin,
                &current,
                kind,
                Some(ExportError::Empty.to_string()),
            )
        }
        Err(e) => AppError::Export(e).into_response(),
    }
}
