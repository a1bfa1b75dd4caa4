//! Authorization gate: decides whether a signed-in identity may use the
//! dashboard.
//!
//! The allow-list record is keyed by the identity's uid. Unknown identities
//! are recorded with role `user` so an operator can promote them, and are
//! turned away. Every store failure is a refusal.

use thiserror::Error;
use tracing::instrument;

use relyce_backend::{AdminUserStore, RepositoryError};
use relyce_core::{AdminRole, IdentityUid};

use super::oauth::{Identity, generate_random_string};
use crate::models::CurrentAdmin;

pub const NOT_ADMIN_MESSAGE: &str = "You do not have admin permissions to access this dashboard.";

/// Length of the per-session dashboard cache key.
const CACHE_KEY_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Result of running an identity through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Role is admin; the session may be established.
    Admitted(CurrentAdmin),
    /// First sign-in: a `user` record was created.
    Registered { uid: IdentityUid, email: String },
    /// A record exists but its role is not admin.
    NotAdmin,
}

impl GateOutcome {
    /// Message shown on the login page when the identity is turned away.
    #[must_use]
    pub fn refusal_message(&self) -> Option<String> {
        match self {
            Self::Admitted(_) => None,
            Self::Registered { uid, email } => Some(format!(
                "Account created, but not authorized. Please ask a system administrator \
                 to change the role for {email} from 'user' to 'admin' (UID: {uid})."
            )),
            Self::NotAdmin => Some(NOT_ADMIN_MESSAGE.to_owned()),
        }
    }
}

/// Look up `identity` in the allow-list.
///
/// # Errors
///
/// Returns `GateError` if the lookup or the registration write fails; callers
/// must treat this as a refusal.
#[instrument(skip(store, identity), fields(uid = %identity.uid))]
pub async fn authorize(
    store: &dyn AdminUserStore,
    identity: &Identity,
) -> Result<GateOutcome, GateError> {
    let Some(record) = store.get(&identity.uid).await? else {
        store
            .create(&identity.uid, &identity.email, AdminRole::User)
            .await?;
        tracing::warn!(email = %identity.email, "Registered unknown identity with role user");
        return Ok(GateOutcome::Registered {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
        });
    };

    if !record.is_admin() {
        tracing::warn!(role = %record.role, "Refused non-admin identity");
        return Ok(GateOutcome::NotAdmin);
    }

    tracing::info!(email = %identity.email, "Admitted admin");
    Ok(GateOutcome::Admitted(CurrentAdmin {
        uid: record.uid,
        email: identity.email.clone(),
        role: record.role,
        cache_key: generate_random_string(CACHE_KEY_LENGTH),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use relyce_backend::memory::MemoryAdminUserStore;

    use super::*;

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: IdentityUid::new(uid),
            email: format!("{uid}@relyce.in"),
        }
    }

    #[tokio::test]
    async fn test_unknown_identity_is_registered_as_user_and_refused() {
        let store = MemoryAdminUserStore::new();
        let outcome = authorize(&store, &identity("g-1001")).await.unwrap();

        assert_eq!(
            outcome,
            GateOutcome::Registered {
                uid: IdentityUid::new("g-1001"),
                email: "g-1001@relyce.in".to_owned(),
            }
        );
        let users = store.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, AdminRole::User);
        assert_eq!(
            outcome.refusal_message().unwrap(),
            "Account created, but not authorized. Please ask a system administrator to change \
             the role for g-1001@relyce.in from 'user' to 'admin' (UID: g-1001)."
        );
    }

    #[tokio::test]
    async fn test_user_role_is_refused() {
        let store = MemoryAdminUserStore::new();
        store.insert("g-1002", "g-1002@relyce.in", AdminRole::User);

        let outcome = authorize(&store, &identity("g-1002")).await.unwrap();
        assert_eq!(outcome, GateOutcome::NotAdmin);
        assert_eq!(outcome.refusal_message().as_deref(), Some(NOT_ADMIN_MESSAGE));
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_is_admitted_with_a_fresh_cache_key() {
        let store = MemoryAdminUserStore::new();
        store.insert("g-1003", "g-1003@relyce.in", AdminRole::Admin);

        let first = authorize(&store, &identity("g-1003")).await.unwrap();
        let second = authorize(&store, &identity("g-1003")).await.unwrap();
        let (GateOutcome::Admitted(a), GateOutcome::Admitted(b)) = (first, second) else {
            panic!("admin should be admitted");
        };
        assert_eq!(a.uid, IdentityUid::new("g-1003"));
        assert_eq!(a.role, AdminRole::Admin);
        assert_ne!(a.cache_key, b.cache_key);
    }

    #[tokio::test]
    async fn test_store_failures_fail_closed() {
        let reads = MemoryAdminUserStore::new();
        reads.insert("g-1004", "g-1004@relyce.in", AdminRole::Admin);
        reads.fail_reads();
        assert!(authorize(&reads, &identity("g-1004")).await.is_err());

        let writes = MemoryAdminUserStore::new();
        writes.fail_writes();
        assert!(authorize(&writes, &identity("g-1005")).await.is_err());
        assert!(writes.users().is_empty());
    }
}
