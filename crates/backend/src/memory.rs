//! In-memory stores with failure injection.
//!
//! Every trait call is counted, so tests can assert that a code path made no
//! backend call at all.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use url::Url;

use relyce_core::{
    AdminRole, AdminUser, ChildRef, ContactInquiry, ContactInquiryId, ContactSubmission, Email,
    IdentityUid, InternshipApplication, InternshipApplicationId, InternshipSubmission, Submitter,
    SubmitterId,
};

use crate::db::{AdminUserStore, RepositoryError, SubmissionStore};
use crate::storage::{ObjectData, ObjectStore, StorageError, StoredObject, validate_object_path};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Submissions
// =============================================================================

#[derive(Debug, Default)]
struct SubmissionFailures {
    scan: Option<String>,
    upsert: bool,
    child_writes: bool,
    deletes: bool,
    contacts_for: HashSet<SubmitterId>,
    internships_for: HashSet<SubmitterId>,
}

#[derive(Debug, Default)]
struct SubmissionData {
    next_id: i32,
    submitters: Vec<Submitter>,
    contacts: Vec<ContactInquiry>,
    internships: Vec<InternshipApplication>,
    failures: SubmissionFailures,
    calls: usize,
}

impl SubmissionData {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    data: Mutex<SubmissionData>,
}

impl MemorySubmissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of trait calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.data).calls
    }

    /// Make the submitter scan fail with `message`.
    pub fn fail_scan(&self, message: &str) {
        lock(&self.data).failures.scan = Some(message.to_owned());
    }

    pub fn fail_upserts(&self) {
        lock(&self.data).failures.upsert = true;
    }

    /// Make child creation fail after the submitter upsert succeeds.
    pub fn fail_child_writes(&self) {
        lock(&self.data).failures.child_writes = true;
    }

    pub fn fail_deletes(&self) {
        lock(&self.data).failures.deletes = true;
    }

    /// Deny reads of one submitter's contact inquiries.
    pub fn deny_contacts_for(&self, submitter_id: SubmitterId) {
        lock(&self.data).failures.contacts_for.insert(submitter_id);
    }

    /// Deny reads of one submitter's internship applications.
    pub fn deny_internships_for(&self, submitter_id: SubmitterId) {
        lock(&self.data).failures.internships_for.insert(submitter_id);
    }

    /// Insert a contact inquiry as-is, without touching the call counter.
    pub fn insert_contact(&self, inquiry: ContactInquiry) {
        lock(&self.data).contacts.push(inquiry);
    }

    /// Insert an internship application as-is, without touching the call counter.
    pub fn insert_internship(&self, application: InternshipApplication) {
        lock(&self.data).internships.push(application);
    }

    #[must_use]
    pub fn submitters(&self) -> Vec<Submitter> {
        lock(&self.data).submitters.clone()
    }

    #[must_use]
    pub fn contact_inquiries(&self) -> Vec<ContactInquiry> {
        lock(&self.data).contacts.clone()
    }

    #[must_use]
    pub fn internship_applications(&self) -> Vec<InternshipApplication> {
        lock(&self.data).internships.clone()
    }

    fn begin(&self) -> MutexGuard<'_, SubmissionData> {
        let mut data = lock(&self.data);
        data.calls += 1;
        data
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn upsert_submitter(
        &self,
        full_name: &str,
        email: &Email,
    ) -> Result<SubmitterId, RepositoryError> {
        let mut data = self.begin();
        if data.failures.upsert {
            return Err(RepositoryError::Unavailable("submitter write failed".to_owned()));
        }
        let now = Utc::now();
        if let Some(existing) = data.submitters.iter_mut().find(|s| s.email == *email) {
            full_name.clone_into(&mut existing.full_name);
            existing.last_submission_at = now;
            return Ok(existing.id);
        }
        let id = SubmitterId::new(data.next_id());
        data.submitters.push(Submitter {
            id,
            full_name: full_name.to_owned(),
            email: email.clone(),
            last_submission_at: now,
            created_at: now,
        });
        Ok(id)
    }

    async fn create_contact_inquiry(
        &self,
        submitter_id: SubmitterId,
        inquiry: &ContactSubmission,
    ) -> Result<ContactInquiryId, RepositoryError> {
        let mut data = self.begin();
        if data.failures.child_writes {
            return Err(RepositoryError::Unavailable("contact write failed".to_owned()));
        }
        let id = ContactInquiryId::new(data.next_id());
        data.contacts.push(ContactInquiry {
            id,
            submitter_id,
            phone: inquiry.phone.clone(),
            company: inquiry.company.clone(),
            contact_method: inquiry.contact_method,
            project_details: inquiry.project_details.clone(),
            requirements: inquiry.requirements.clone(),
            submitted_at: Some(Utc::now()),
        });
        Ok(id)
    }

    async fn create_internship_application(
        &self,
        submitter_id: SubmitterId,
        application: &InternshipSubmission,
        resume_path: &str,
    ) -> Result<InternshipApplicationId, RepositoryError> {
        let mut data = self.begin();
        if data.failures.child_writes {
            return Err(RepositoryError::Unavailable(
                "internship write failed".to_owned(),
            ));
        }
        let id = InternshipApplicationId::new(data.next_id());
        data.internships.push(InternshipApplication {
            id,
            submitter_id,
            phone: application.phone.clone(),
            college: application.college.clone(),
            contact_method: application.contact_method,
            domain: application.domain,
            linkedin_url: application.linkedin.to_string(),
            about_you: application.about_you.clone(),
            why_internship: application.why_internship.clone(),
            resume_path: Some(resume_path.to_owned()),
            resume_url: None,
            submitted_at: Some(Utc::now()),
        });
        Ok(id)
    }

    async fn list_submitters(&self) -> Result<Vec<Submitter>, RepositoryError> {
        let data = self.begin();
        if let Some(message) = &data.failures.scan {
            return Err(RepositoryError::PermissionDenied(message.clone()));
        }
        Ok(data.submitters.clone())
    }

    async fn list_contact_inquiries(
        &self,
        submitter_id: SubmitterId,
    ) -> Result<Vec<ContactInquiry>, RepositoryError> {
        let data = self.begin();
        if data.failures.contacts_for.contains(&submitter_id) {
            return Err(RepositoryError::PermissionDenied(
                "missing or insufficient permissions".to_owned(),
            ));
        }
        Ok(data
            .contacts
            .iter()
            .filter(|c| c.submitter_id == submitter_id)
            .cloned()
            .collect())
    }

    async fn list_internship_applications(
        &self,
        submitter_id: SubmitterId,
    ) -> Result<Vec<InternshipApplication>, RepositoryError> {
        let data = self.begin();
        if data.failures.internships_for.contains(&submitter_id) {
            return Err(RepositoryError::PermissionDenied(
                "missing or insufficient permissions".to_owned(),
            ));
        }
        Ok(data
            .internships
            .iter()
            .filter(|a| a.submitter_id == submitter_id)
            .cloned()
            .collect())
    }

    async fn delete_child(
        &self,
        submitter_id: SubmitterId,
        child: ChildRef,
    ) -> Result<(), RepositoryError> {
        let mut data = self.begin();
        if data.failures.deletes {
            return Err(RepositoryError::PermissionDenied(
                "missing or insufficient permissions".to_owned(),
            ));
        }
        match child {
            ChildRef::Contact(id) => data
                .contacts
                .retain(|c| !(c.id == id && c.submitter_id == submitter_id)),
            ChildRef::Internship(id) => data
                .internships
                .retain(|a| !(a.id == id && a.submitter_id == submitter_id)),
        }
        Ok(())
    }
}

// =============================================================================
// Allow-list
// =============================================================================

#[derive(Debug, Default)]
struct AdminUserData {
    users: Vec<AdminUser>,
    fail_reads: bool,
    fail_writes: bool,
}

#[derive(Debug, Default)]
pub struct MemoryAdminUserStore {
    data: Mutex<AdminUserData>,
}

impl MemoryAdminUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly.
    pub fn insert(&self, uid: &str, email: &str, role: AdminRole) {
        lock(&self.data).users.push(AdminUser {
            uid: IdentityUid::new(uid),
            email: email.to_owned(),
            role,
            created_at: Utc::now(),
        });
    }

    pub fn fail_reads(&self) {
        lock(&self.data).fail_reads = true;
    }

    pub fn fail_writes(&self) {
        lock(&self.data).fail_writes = true;
    }

    #[must_use]
    pub fn users(&self) -> Vec<AdminUser> {
        lock(&self.data).users.clone()
    }
}

#[async_trait]
impl AdminUserStore for MemoryAdminUserStore {
    async fn get(&self, uid: &IdentityUid) -> Result<Option<AdminUser>, RepositoryError> {
        let data = lock(&self.data);
        if data.fail_reads {
            return Err(RepositoryError::Unavailable("allow-list read failed".to_owned()));
        }
        Ok(data.users.iter().find(|u| u.uid == *uid).cloned())
    }

    async fn create(
        &self,
        uid: &IdentityUid,
        email: &str,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError> {
        let mut data = lock(&self.data);
        if data.fail_writes {
            return Err(RepositoryError::Unavailable("allow-list write failed".to_owned()));
        }
        if data.users.iter().any(|u| u.uid == *uid) {
            return Err(RepositoryError::Conflict(format!("uid {uid} exists")));
        }
        let user = AdminUser {
            uid: uid.clone(),
            email: email.to_owned(),
            role,
            created_at: Utc::now(),
        };
        data.users.push(user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let data = lock(&self.data);
        if data.fail_reads {
            return Err(RepositoryError::Unavailable("allow-list read failed".to_owned()));
        }
        Ok(data.users.clone())
    }

    async fn set_role(&self, uid: &IdentityUid, role: AdminRole) -> Result<(), RepositoryError> {
        let mut data = lock(&self.data);
        if data.fail_writes {
            return Err(RepositoryError::Unavailable("allow-list write failed".to_owned()));
        }
        let user = data
            .users
            .iter_mut()
            .find(|u| u.uid == *uid)
            .ok_or(RepositoryError::NotFound)?;
        user.role = role;
        Ok(())
    }
}

// =============================================================================
// Objects
// =============================================================================

#[derive(Debug, Default)]
struct ObjectStoreData {
    objects: HashMap<String, ObjectData>,
    fail_uploads: bool,
    fail_signing: bool,
    calls: usize,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    data: Mutex<ObjectStoreData>,
}

impl MemoryObjectStore {
    /// Host used for links issued by this store.
    pub const SIGNED_BASE: &'static str = "https://objects.relyce.test/";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        lock(&self.data).calls
    }

    pub fn fail_uploads(&self) {
        lock(&self.data).fail_uploads = true;
    }

    pub fn fail_signing(&self) {
        lock(&self.data).fail_signing = true;
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        lock(&self.data).objects.contains_key(path)
    }

    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = lock(&self.data).objects.keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_object_path(path)?;
        let mut data = lock(&self.data);
        data.calls += 1;
        if data.fail_uploads {
            return Err(StorageError::Unavailable("upload failed".to_owned()));
        }
        data.objects.insert(
            path.to_owned(),
            ObjectData {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(StoredObject {
            path: path.to_owned(),
        })
    }

    async fn signed_url(&self, path: &str) -> Result<Url, StorageError> {
        let mut data = lock(&self.data);
        data.calls += 1;
        if data.fail_signing {
            return Err(StorageError::Unavailable("signing failed".to_owned()));
        }
        if !data.objects.contains_key(path) {
            return Err(StorageError::NotFound(path.to_owned()));
        }
        let mut url = Url::parse(Self::SIGNED_BASE)
            .and_then(|base| base.join(path))
            .map_err(|_| StorageError::InvalidPath(path.to_owned()))?;
        url.query_pairs_mut().append_pair("signature", "memory");
        Ok(url)
    }

    async fn fetch(&self, path: &str) -> Result<ObjectData, StorageError> {
        let mut data = lock(&self.data);
        data.calls += 1;
        data.objects
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_is_keyed_by_email() {
        let store = MemorySubmissionStore::new();
        let email = Email::parse("ana@example.com").unwrap();

        let first = store.upsert_submitter("Ana", &email).await.unwrap();
        let second = store.upsert_submitter("Ana Maria", &email).await.unwrap();

        assert_eq!(first, second);
        let submitters = store.submitters();
        assert_eq!(submitters.len(), 1);
        assert_eq!(submitters[0].full_name, "Ana Maria");
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_denied_reads_are_per_submitter() {
        let store = MemorySubmissionStore::new();
        let a = store
            .upsert_submitter("A", &Email::parse("a@example.com").unwrap())
            .await
            .unwrap();
        let b = store
            .upsert_submitter("B", &Email::parse("b@example.com").unwrap())
            .await
            .unwrap();
        store.deny_internships_for(a);

        let err = store.list_internship_applications(a).await.unwrap_err();
        assert!(err.is_permission_denied());
        assert!(store.list_internship_applications(b).await.is_ok());
        assert!(store.list_contact_inquiries(a).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_create_conflicts() {
        let store = MemoryAdminUserStore::new();
        let uid = IdentityUid::new("g-1");
        store.create(&uid, "x@example.com", AdminRole::User).await.unwrap();
        assert!(matches!(
            store.create(&uid, "x@example.com", AdminRole::User).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_object_store_signing() {
        let store = MemoryObjectStore::new();
        store
            .upload("resumes/1_a.pdf", vec![1], "application/pdf")
            .await
            .unwrap();
        let url = store.signed_url("resumes/1_a.pdf").await.unwrap();
        assert_eq!(url.path(), "/resumes/1_a.pdf");
        assert!(matches!(
            store.signed_url("resumes/none.pdf").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
