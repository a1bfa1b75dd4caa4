//! Business logic behind the dashboard routes.

pub mod cache;
pub mod dashboard;
pub mod export;
pub mod gate;
pub mod oauth;
pub mod resume;

pub use cache::DashboardCache;
pub use dashboard::{DashboardState, DashboardStatus, SubmitterRecords};
pub use gate::{GateOutcome, authorize};
pub use oauth::{GoogleOidcClient, Identity, IdentityProvider, OAuthError};
