//! Stored record shapes.
//!
//! A [`Submitter`] owns any number of [`ContactInquiry`] and
//! [`InternshipApplication`] children. Children carry their parent's id but
//! the link is not enforced by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{ContactInquiryId, IdentityUid, InternshipApplicationId, SubmitterId};
use super::status::{AdminRole, ChildKind, ContactMethod, InternshipDomain};

/// One person across any number of form submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub id: SubmitterId,
    pub full_name: String,
    pub email: Email,
    pub last_submission_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInquiry {
    pub id: ContactInquiryId,
    pub submitter_id: SubmitterId,
    pub phone: String,
    pub company: String,
    pub contact_method: ContactMethod,
    pub project_details: String,
    pub requirements: String,
    /// Absent on rows imported without a server timestamp.
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternshipApplication {
    pub id: InternshipApplicationId,
    pub submitter_id: SubmitterId,
    pub phone: String,
    pub college: String,
    pub contact_method: ContactMethod,
    pub domain: InternshipDomain,
    pub linkedin_url: String,
    pub about_you: String,
    pub why_internship: String,
    /// Object-store path of the uploaded résumé.
    pub resume_path: Option<String>,
    /// Direct link recorded by older submissions; preferred over the path.
    pub resume_url: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl InternshipApplication {
    /// Whether there is anything to open for the résumé.
    #[must_use]
    pub fn has_resume(&self) -> bool {
        self.resume_url.as_deref().is_some_and(|s| !s.is_empty())
            || self.resume_path.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Allow-list record keyed by the identity provider's uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub uid: IdentityUid,
    pub email: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

impl AdminUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == AdminRole::Admin
    }
}

/// Address of a single child record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildRef {
    Contact(ContactInquiryId),
    Internship(InternshipApplicationId),
}

impl ChildRef {
    /// Build a reference from a collection kind and a raw id.
    #[must_use]
    pub const fn new(kind: ChildKind, id: i32) -> Self {
        match kind {
            ChildKind::Contact => Self::Contact(ContactInquiryId::new(id)),
            ChildKind::Internship => Self::Internship(InternshipApplicationId::new(id)),
        }
    }

    #[must_use]
    pub const fn kind(self) -> ChildKind {
        match self {
            Self::Contact(_) => ChildKind::Contact,
            Self::Internship(_) => ChildKind::Internship,
        }
    }

    #[must_use]
    pub const fn raw_id(self) -> i32 {
        match self {
            Self::Contact(id) => id.as_i32(),
            Self::Internship(id) => id.as_i32(),
        }
    }
}
