//! Per-session dashboard cache.
//!
//! A page load stores the aggregated state under the session's cache key.
//! Tab switches, deletes and exports work from that copy until the next
//! page load or sign-out.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::RwLock;

use super::dashboard::DashboardState;

/// Upper bound on concurrently cached sessions.
const MAX_SESSIONS: u64 = 1_000;

pub type SharedDashboard = Arc<RwLock<DashboardState>>;

#[derive(Clone)]
pub struct DashboardCache {
    entries: Cache<String, SharedDashboard>,
}

impl DashboardCache {
    /// Entries not touched for `idle` are evicted.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Replace the session's snapshot.
    pub async fn store(&self, key: &str, state: DashboardState) -> SharedDashboard {
        let shared = Arc::new(RwLock::new(state));
        self.entries.insert(key.to_owned(), shared.clone()).await;
        shared
    }

    pub async fn get(&self, key: &str) -> Option<SharedDashboard> {
        self.entries.get(key).await
    }

    /// Forget the session's snapshot.
    pub async fn remove(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}
