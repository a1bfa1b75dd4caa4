//! Application state shared across handlers.

use std::sync::Arc;

use relyce_backend::{ObjectStore, SubmissionStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable; the stores sit behind trait objects so the router can
/// run against `PostgreSQL` and the filesystem in production and against the
/// in-memory backend in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    submissions: Arc<dyn SubmissionStore>,
    objects: Arc<dyn ObjectStore>,
}

impl AppState {
    #[must_use]
    pub fn new(submissions: Arc<dyn SubmissionStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                submissions,
                objects,
            }),
        }
    }

    /// Document store for submitters and their records.
    #[must_use]
    pub fn submissions(&self) -> &dyn SubmissionStore {
        self.inner.submissions.as_ref()
    }

    /// Object store for résumé uploads.
    #[must_use]
    pub fn objects(&self) -> &dyn ObjectStore {
        self.inner.objects.as_ref()
    }
}
