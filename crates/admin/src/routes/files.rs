//! Résumé links and signed object downloads.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use relyce_backend::StorageError;
use relyce_backend::storage::validate_object_path;

use super::views::MessageTemplate;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::services::resume::{self, ResumeLinkError};
use crate::state::AppState;

pub const RESUME_FAILED_MESSAGE: &str = "Unable to open resume. Please try again.";

#[derive(Debug, Deserialize)]
pub struct ResumeQuery {
    pub path: Option<String>,
    pub url: Option<String>,
}

/// GET /resume
///
/// Redirects to the direct link when one was recorded, otherwise to a freshly
/// signed link for the stored path.
#[instrument(skip_all)]
pub async fn open_resume(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ResumeQuery>,
) -> Response {
    match resume::resolve(
        state.objects(),
        query.path.as_deref(),
        query.url.as_deref(),
    )
    .await
    {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(ResumeLinkError::Missing) => {
            AppError::BadRequest("no resume to open".to_owned()).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to resolve resume link");
            (
                StatusCode::BAD_GATEWAY,
                MessageTemplate {
                    title: "Resume unavailable",
                    message: RESUME_FAILED_MESSAGE,
                },
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub expires: Option<i64>,
    pub signature: Option<String>,
}

/// GET /storage/{*path}
///
/// Serves an object to anyone holding a valid, unexpired signature.
#[instrument(skip_all, fields(path = %path))]
pub async fn signed_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, AppError> {
    validate_object_path(&path).map_err(|_| AppError::Forbidden("invalid link".to_owned()))?;

    let (Some(expires), Some(signature)) = (query.expires, query.signature) else {
        return Err(AppError::Forbidden("invalid link".to_owned()));
    };
    state
        .signer()
        .verify(&path, expires, &signature, Utc::now())
        .map_err(|e| {
            tracing::warn!(error = %e, "Rejected signed link");
            AppError::Forbidden(e.to_string())
        })?;

    let object = state.objects().fetch(&path).await.map_err(|e| match e {
        StorageError::NotFound(path) => AppError::NotFound(path),
        other => AppError::Storage(other),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CONTENT_DISPOSITION, "inline".to_owned()),
            (header::CACHE_CONTROL, "private, max-age=300".to_owned()),
        ],
        object.bytes,
    )
        .into_response())
}
