//! Object storage: uploaded résumés and their signed download links.

pub mod local;
pub mod signing;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use local::LocalObjectStore;
pub use signing::{SigningError, UrlSigner};

#[derive(Debug, Error)]
pub enum StorageError {
    /// Path is empty, absolute, or escapes the store root.
    #[error("invalid object path: {0}")]
    InvalidPath(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Failure injected by an in-memory store.
    #[error("{0}")]
    Unavailable(String),
}

/// Reference to an uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
}

/// Bytes and content type of a stored object.
#[derive(Debug, Clone)]
pub struct ObjectData {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store capabilities.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`, replacing any existing object.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Resolve `path` to a temporary signed URL.
    async fn signed_url(&self, path: &str) -> Result<Url, StorageError>;

    /// Read an object back.
    async fn fetch(&self, path: &str) -> Result<ObjectData, StorageError>;
}

/// Validate a relative object path of `/`-separated normal segments.
///
/// # Errors
///
/// Returns `StorageError::InvalidPath` for empty, absolute, dotted or
/// backslashed paths.
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidPath(path.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_path() {
        assert!(validate_object_path("resumes/1_cv.pdf").is_ok());
        assert!(validate_object_path("").is_err());
        assert!(validate_object_path("/etc/passwd").is_err());
        assert!(validate_object_path("resumes/../secret").is_err());
        assert!(validate_object_path("resumes//a.pdf").is_err());
        assert!(validate_object_path("resumes\\a.pdf").is_err());
    }
}
