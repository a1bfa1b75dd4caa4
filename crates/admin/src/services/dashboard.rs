//! Dashboard aggregation.
//!
//! One page load scans every submitter and fetches both child collections
//! for each. A failed child fetch only empties that collection for that
//! submitter; a failed scan fails the whole load.

use futures::{StreamExt, stream};
use tracing::instrument;

use relyce_backend::{AdminUserStore, RepositoryError, SubmissionStore};
use relyce_core::{
    ChildKind, ChildRef, ContactInquiry, InternshipApplication, Submitter, SubmitterId,
};

use crate::models::CurrentAdmin;

/// Submitters whose children are fetched at the same time.
const FETCH_CONCURRENCY: usize = 8;

/// A submitter and whatever children could be read for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterRecords {
    pub submitter: Submitter,
    pub contacts: Vec<ContactInquiry>,
    pub internships: Vec<InternshipApplication>,
}

impl SubmitterRecords {
    #[must_use]
    pub fn count(&self, kind: ChildKind) -> usize {
        match kind {
            ChildKind::Contact => self.contacts.len(),
            ChildKind::Internship => self.internships.len(),
        }
    }
}

/// Aggregated records for one admin session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    submitters: Vec<SubmitterRecords>,
}

impl DashboardState {
    #[must_use]
    pub const fn new(submitters: Vec<SubmitterRecords>) -> Self {
        Self { submitters }
    }

    /// Every submitter, in scan order.
    #[must_use]
    pub fn submitters(&self) -> &[SubmitterRecords] {
        &self.submitters
    }

    /// Submitters with at least one child of `kind`.
    pub fn tab(&self, kind: ChildKind) -> impl Iterator<Item = &SubmitterRecords> {
        self.submitters.iter().filter(move |s| s.count(kind) > 0)
    }

    /// Number of child records of `kind`.
    #[must_use]
    pub fn count(&self, kind: ChildKind) -> usize {
        self.submitters.iter().map(|s| s.count(kind)).sum()
    }

    /// Drop one child after its remote delete succeeded.
    ///
    /// Returns whether anything was removed. Siblings and the submitter
    /// itself are left as they are.
    pub fn remove_child(&mut self, submitter_id: SubmitterId, child: ChildRef) -> bool {
        let Some(records) = self
            .submitters
            .iter_mut()
            .find(|s| s.submitter.id == submitter_id)
        else {
            return false;
        };
        match child {
            ChildRef::Contact(id) => {
                let before = records.contacts.len();
                records.contacts.retain(|c| c.id != id);
                records.contacts.len() != before
            }
            ChildRef::Internship(id) => {
                let before = records.internships.len();
                records.internships.retain(|a| a.id != id);
                records.internships.len() != before
            }
        }
    }
}

/// Where a dashboard load ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardStatus {
    Unauthenticated,
    Unauthorized,
    Error(String),
    Ready(DashboardState),
}

/// Message shown when the submitter scan fails.
#[must_use]
pub fn scan_error_message(err: &RepositoryError) -> String {
    format!("{err}. Check that your allow-list record has role 'admin'.")
}

/// Load the dashboard for the session's admin.
///
/// The allow-list record is re-read first: a role changed since sign-in
/// takes effect on the next page load.
#[instrument(skip_all)]
pub async fn load(
    submissions: &dyn SubmissionStore,
    admins: &dyn AdminUserStore,
    admin: Option<&CurrentAdmin>,
) -> DashboardStatus {
    let Some(admin) = admin else {
        return DashboardStatus::Unauthenticated;
    };

    match admins.get(&admin.uid).await {
        Ok(Some(record)) => {
            tracing::info!(uid = %admin.uid, role = %record.role, "Dashboard load");
            if !record.is_admin() {
                return DashboardStatus::Unauthorized;
            }
        }
        Ok(None) => {
            tracing::error!(uid = %admin.uid, "Allow-list record is missing");
            return DashboardStatus::Unauthorized;
        }
        Err(e) => {
            tracing::error!(uid = %admin.uid, error = %e, "Could not read own allow-list record");
            return DashboardStatus::Error(scan_error_message(&e));
        }
    }

    match aggregate(submissions).await {
        Ok(state) => DashboardStatus::Ready(state),
        Err(e) => {
            tracing::error!(error = %e, "Submitter scan failed");
            DashboardStatus::Error(scan_error_message(&e))
        }
    }
}

/// Scan submitters and attach their children, preserving scan order.
///
/// # Errors
///
/// Returns the scan's `RepositoryError`. Child fetch failures are logged
/// and never returned.
pub async fn aggregate(store: &dyn SubmissionStore) -> Result<DashboardState, RepositoryError> {
    let submitters = store.list_submitters().await?;
    tracing::info!(count = submitters.len(), "Fetched submitters");

    let submitters = stream::iter(submitters)
        .map(|submitter| fetch_children(store, submitter))
        .buffered(FETCH_CONCURRENCY)
        .collect()
        .await;

    Ok(DashboardState::new(submitters))
}

async fn fetch_children(store: &dyn SubmissionStore, submitter: Submitter) -> SubmitterRecords {
    let (contacts, internships) = futures::join!(
        store.list_contact_inquiries(submitter.id),
        store.list_internship_applications(submitter.id),
    );

    SubmitterRecords {
        contacts: or_empty(contacts, submitter.id, ChildKind::Contact),
        internships: or_empty(internships, submitter.id, ChildKind::Internship),
        submitter,
    }
}

fn or_empty<T>(
    fetched: Result<Vec<T>, RepositoryError>,
    submitter_id: SubmitterId,
    kind: ChildKind,
) -> Vec<T> {
    fetched.unwrap_or_else(|e| {
        tracing::error!(
            submitter_id = %submitter_id,
            collection = %kind,
            error = %e,
            "Child fetch failed, showing none"
        );
        Vec::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use relyce_backend::memory::{MemoryAdminUserStore, MemorySubmissionStore};
    use relyce_core::{
        AdminRole, ContactInquiryId, ContactMethod, Email, IdentityUid, InternshipApplicationId,
        InternshipDomain,
    };

    use super::*;

    fn contact(id: i32, submitter_id: SubmitterId) -> ContactInquiry {
        ContactInquiry {
            id: ContactInquiryId::new(id),
            submitter_id,
            phone: "9876543210".to_owned(),
            company: "Kumar Textiles".to_owned(),
            contact_method: ContactMethod::Phone,
            project_details: "Online catalogue".to_owned(),
            requirements: "Product pages".to_owned(),
            submitted_at: Some(Utc::now()),
        }
    }

    fn internship(id: i32, submitter_id: SubmitterId) -> InternshipApplication {
        InternshipApplication {
            id: InternshipApplicationId::new(id),
            submitter_id,
            phone: "9123456780".to_owned(),
            college: "PSG College of Technology".to_owned(),
            contact_method: ContactMethod::Email,
            domain: InternshipDomain::CloudComputing,
            linkedin_url: "https://www.linkedin.com/in/priya".to_owned(),
            about_you: "Final-year student".to_owned(),
            why_internship: "Hands-on cloud work".to_owned(),
            resume_path: Some("resumes/1_cv.pdf".to_owned()),
            resume_url: None,
            submitted_at: Some(Utc::now()),
        }
    }

    async fn submitter(store: &MemorySubmissionStore, email: &str) -> SubmitterId {
        store
            .upsert_submitter("Applicant", &Email::parse(email).unwrap())
            .await
            .unwrap()
    }

    fn admin(uid: &str) -> CurrentAdmin {
        CurrentAdmin {
            uid: IdentityUid::new(uid),
            email: format!("{uid}@relyce.in"),
            role: AdminRole::Admin,
            cache_key: "cache".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_child_failure_is_isolated_to_one_submitter() {
        let store = MemorySubmissionStore::new();
        let first = submitter(&store, "arun@example.com").await;
        let second = submitter(&store, "priya@example.com").await;
        store.insert_contact(contact(100, first));
        store.insert_internship(internship(101, first));
        store.insert_contact(contact(200, second));
        store.insert_internship(internship(201, second));
        store.deny_internships_for(first);

        let state = aggregate(&store).await.unwrap();
        let submitters = state.submitters();
        assert_eq!(submitters.len(), 2);
        assert_eq!(submitters[0].submitter.id, first);
        assert_eq!(submitters[0].contacts.len(), 1);
        assert!(submitters[0].internships.is_empty());
        assert_eq!(submitters[1].contacts.len(), 1);
        assert_eq!(submitters[1].internships.len(), 1);
    }

    #[tokio::test]
    async fn test_tabs_filter_by_kind_and_count_children() {
        let store = MemorySubmissionStore::new();
        let first = submitter(&store, "arun@example.com").await;
        let second = submitter(&store, "priya@example.com").await;
        store.insert_contact(contact(100, first));
        store.insert_contact(contact(102, first));
        store.insert_internship(internship(201, second));

        let state = aggregate(&store).await.unwrap();
        assert_eq!(state.count(ChildKind::Contact), 2);
        assert_eq!(state.count(ChildKind::Internship), 1);

        let contact_tab: Vec<_> = state.tab(ChildKind::Contact).map(|s| s.submitter.id).collect();
        assert_eq!(contact_tab, vec![first]);
        let internship_tab: Vec<_> =
            state.tab(ChildKind::Internship).map(|s| s.submitter.id).collect();
        assert_eq!(internship_tab, vec![second]);
    }

    #[tokio::test]
    async fn test_remove_child_leaves_siblings() {
        let store = MemorySubmissionStore::new();
        let first = submitter(&store, "arun@example.com").await;
        store.insert_contact(contact(100, first));
        store.insert_contact(contact(102, first));
        store.insert_internship(internship(101, first));

        let mut state = aggregate(&store).await.unwrap();
        let calls = store.calls();
        assert!(state.remove_child(first, ChildRef::Contact(ContactInquiryId::new(100))));

        let records = &state.submitters()[0];
        assert_eq!(records.contacts.len(), 1);
        assert_eq!(records.contacts[0].id, ContactInquiryId::new(102));
        assert_eq!(records.internships.len(), 1);
        assert_eq!(store.calls(), calls);

        assert!(!state.remove_child(first, ChildRef::Contact(ContactInquiryId::new(100))));
        assert!(!state.remove_child(
            SubmitterId::new(99),
            ChildRef::Contact(ContactInquiryId::new(102))
        ));
    }

    #[tokio::test]
    async fn test_load_requires_a_session() {
        let store = MemorySubmissionStore::new();
        let admins = MemoryAdminUserStore::new();
        assert_eq!(
            load(&store, &admins, None).await,
            DashboardStatus::Unauthenticated
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_load_rechecks_the_role() {
        let store = MemorySubmissionStore::new();
        let admins = MemoryAdminUserStore::new();
        admins.insert("g-1", "g-1@relyce.in", AdminRole::User);

        assert_eq!(
            load(&store, &admins, Some(&admin("g-1"))).await,
            DashboardStatus::Unauthorized
        );
        assert_eq!(
            load(&store, &admins, Some(&admin("g-missing"))).await,
            DashboardStatus::Unauthorized
        );
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_scan_failure_carries_the_role_hint() {
        let store = MemorySubmissionStore::new();
        store.fail_scan("missing or insufficient permissions");
        let admins = MemoryAdminUserStore::new();
        admins.insert("g-1", "g-1@relyce.in", AdminRole::Admin);

        let status = load(&store, &admins, Some(&admin("g-1"))).await;
        assert_eq!(
            status,
            DashboardStatus::Error(
                "permission denied: missing or insufficient permissions. \
                 Check that your allow-list record has role 'admin'."
                    .to_owned()
            )
        );
    }

    #[tokio::test]
    async fn test_admin_load_is_ready() {
        let store = MemorySubmissionStore::new();
        let first = submitter(&store, "arun@example.com").await;
        store.insert_contact(contact(100, first));
        let admins = MemoryAdminUserStore::new();
        admins.insert("g-1", "g-1@relyce.in", AdminRole::Admin);

        let DashboardStatus::Ready(state) = load(&store, &admins, Some(&admin("g-1"))).await else {
            panic!("admin load should be ready");
        };
        assert_eq!(state.count(ChildKind::Contact), 1);
    }
}
