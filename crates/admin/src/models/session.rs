//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use relyce_core::{AdminRole, IdentityUid};

/// Session-stored admin identity.
///
/// Written once the authorization gate admits a sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Identity-provider uid, also the allow-list key.
    pub uid: IdentityUid,
    pub email: String,
    pub role: AdminRole,
    /// Key of this session's entry in the dashboard cache.
    pub cache_key: String,
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// CSRF token echoed back by the identity provider.
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Nonce sent with the authorization request.
    pub const OAUTH_NONCE: &str = "oauth_nonce";
}
