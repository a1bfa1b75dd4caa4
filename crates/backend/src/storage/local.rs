//! Filesystem object store.
//!
//! Objects live at `{root}/{path}` with their content type recorded in a
//! sibling `{path}.content-type` file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};
use url::Url;

use super::{
    ObjectData, ObjectStore, SigningError, StorageError, StoredObject, UrlSigner,
    validate_object_path,
};
use crate::config::StorageConfig;

const CONTENT_TYPE_SUFFIX: &str = ".content-type";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    signer: UrlSigner,
}

impl LocalObjectStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, signer: UrlSigner) -> Self {
        Self {
            root: root.into(),
            signer,
        }
    }

    /// Build a store from environment-derived settings.
    ///
    /// # Errors
    ///
    /// Returns `SigningError::InvalidBase` if the link base URL is unusable.
    pub fn from_config(config: &StorageConfig) -> Result<Self, SigningError> {
        let signer = UrlSigner::new(
            config.signing_secret.clone(),
            &config.link_base_url,
            config.signed_url_ttl,
        )?;
        Ok(Self::new(config.root.clone(), signer))
    }

    /// The signer used for download links, for verifying them on the way in.
    #[must_use]
    pub const fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_object_path(path)?;
        Ok(self.root.join(path))
    }

    fn content_type_path(file: &Path) -> PathBuf {
        let mut name = file.as_os_str().to_owned();
        name.push(CONTENT_TYPE_SUFFIX);
        PathBuf::from(name)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file, &bytes).await?;
        tokio::fs::write(Self::content_type_path(&file), content_type).await?;
        debug!("object stored");

        Ok(StoredObject {
            path: path.to_owned(),
        })
    }

    async fn signed_url(&self, path: &str) -> Result<Url, StorageError> {
        let file = self.resolve(path)?;
        if !tokio::fs::try_exists(&file).await? {
            return Err(StorageError::NotFound(path.to_owned()));
        }
        Ok(self.signer.sign(path, Utc::now())?)
    }

    async fn fetch(&self, path: &str) -> Result<ObjectData, StorageError> {
        let file = self.resolve(path)?;
        let bytes = match tokio::fs::read(&file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(path.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        let content_type = tokio::fs::read_to_string(Self::content_type_path(&file))
            .await
            .map_or_else(|_| DEFAULT_CONTENT_TYPE.to_owned(), |s| s.trim().to_owned());

        Ok(ObjectData {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn store(root: &Path) -> LocalObjectStore {
        let signer = UrlSigner::new(
            SecretString::from("k8Jq2mZ7vR4xN1pL9sT3wB6yC0dF5gHa".to_string()),
            "http://127.0.0.1:3001",
            Duration::from_secs(60),
        )
        .unwrap();
        LocalObjectStore::new(root, signer)
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let stored = store
            .upload("resumes/1_cv.pdf", b"%PDF-1.7".to_vec(), "application/pdf")
            .await
            .unwrap();
        assert_eq!(stored.path, "resumes/1_cv.pdf");
        assert!(dir.path().join("resumes/1_cv.pdf").exists());

        let data = store.fetch("resumes/1_cv.pdf").await.unwrap();
        assert_eq!(data.bytes, b"%PDF-1.7");
        assert_eq!(data.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_signed_url_requires_existing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(
            store.signed_url("resumes/missing.pdf").await,
            Err(StorageError::NotFound(_))
        ));

        store
            .upload("resumes/2_cv.pdf", vec![1, 2, 3], "application/pdf")
            .await
            .unwrap();
        let url = store.signed_url("resumes/2_cv.pdf").await.unwrap();
        assert_eq!(url.path(), "/storage/resumes/2_cv.pdf");
        assert!(url.query().unwrap().contains("signature="));
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        assert!(matches!(
            store.upload("../outside.pdf", vec![], "application/pdf").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            store.fetch("/etc/passwd").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            store(dir.path()).fetch("resumes/none.pdf").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
