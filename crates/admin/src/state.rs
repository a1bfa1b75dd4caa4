//! Application state shared across handlers.

use std::sync::Arc;

use relyce_backend::storage::UrlSigner;
use relyce_backend::{AdminUserStore, ObjectStore, SubmissionStore};

use crate::services::{DashboardCache, IdentityProvider};

/// Application state shared across all handlers.
///
/// Cheaply cloneable; every backend sits behind a trait object so the
/// router runs against `PostgreSQL`, the filesystem and Google in
/// production, and against in-memory fakes in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    oauth_redirect_uri: String,
    submissions: Arc<dyn SubmissionStore>,
    admins: Arc<dyn AdminUserStore>,
    objects: Arc<dyn ObjectStore>,
    signer: UrlSigner,
    identity: Arc<dyn IdentityProvider>,
    dashboards: DashboardCache,
}

/// Backends the dashboard is wired to.
pub struct Backends {
    pub submissions: Arc<dyn SubmissionStore>,
    pub admins: Arc<dyn AdminUserStore>,
    pub objects: Arc<dyn ObjectStore>,
    /// Verifies links served under `/storage`.
    pub signer: UrlSigner,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    #[must_use]
    pub fn new(oauth_redirect_uri: String, backends: Backends, dashboards: DashboardCache) -> Self {
        let Backends {
            submissions,
            admins,
            objects,
            signer,
            identity,
        } = backends;
        Self {
            inner: Arc::new(AppStateInner {
                oauth_redirect_uri,
                submissions,
                admins,
                objects,
                signer,
                identity,
                dashboards,
            }),
        }
    }

    /// Callback URL registered with the identity provider.
    #[must_use]
    pub fn oauth_redirect_uri(&self) -> &str {
        &self.inner.oauth_redirect_uri
    }

    #[must_use]
    pub fn submissions(&self) -> &dyn SubmissionStore {
        self.inner.submissions.as_ref()
    }

    /// Allow-list of dashboard identities.
    #[must_use]
    pub fn admins(&self) -> &dyn AdminUserStore {
        self.inner.admins.as_ref()
    }

    #[must_use]
    pub fn objects(&self) -> &dyn ObjectStore {
        self.inner.objects.as_ref()
    }

    #[must_use]
    pub fn signer(&self) -> &UrlSigner {
        &self.inner.signer
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    #[must_use]
    pub fn dashboards(&self) -> &DashboardCache {
        &self.inner.dashboards
    }
}
