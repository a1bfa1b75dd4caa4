//! Résumé link resolution.

use thiserror::Error;
use url::Url;

use relyce_backend::{ObjectStore, StorageError};

#[derive(Debug, Error)]
pub enum ResumeLinkError {
    /// Neither a direct link nor a stored path was given.
    #[error("no resume reference")]
    Missing,

    #[error("invalid resume link: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve a résumé reference to a URL the browser can open.
///
/// A recorded direct link wins. Otherwise the stored path is exchanged for a
/// signed link. Only `http` and `https` links are ever returned.
///
/// # Errors
///
/// Returns `ResumeLinkError` if nothing was given, the direct link is not
/// an http(s) URL, or signing fails.
pub async fn resolve(
    objects: &dyn ObjectStore,
    path: Option<&str>,
    url: Option<&str>,
) -> Result<Url, ResumeLinkError> {
    if let Some(url) = present(url) {
        let parsed = Url::parse(url).map_err(|_| ResumeLinkError::InvalidUrl(url.to_owned()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ResumeLinkError::InvalidUrl(url.to_owned()));
        }
        return Ok(parsed);
    }

    let path = present(path).ok_or(ResumeLinkError::Missing)?;
    Ok(objects.signed_url(path).await?)
}
