//! Templates and the view models they render.

use askama::Template;
use askama_web::WebTemplate;
use chrono::{DateTime, Utc};

use relyce_core::{ChildKind, ContactInquiry, InternshipApplication};

use crate::models::CurrentAdmin;
use crate::services::{DashboardState, SubmitterRecords};

pub const CONFIRM_ACCEPT: &str = "Are you sure you want to accept and remove this application?";

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub message: Option<String>,
}

impl LoginTemplate {
    #[must_use]
    pub const fn blank() -> Self {
        Self { message: None }
    }

    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// Full dashboard page.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub email: String,
    /// Absent when the load failed.
    pub panel: Option<TabPanel>,
    pub error: Option<String>,
}

impl DashboardTemplate {
    #[must_use]
    pub fn ready(admin: &CurrentAdmin, panel: TabPanel) -> Self {
        Self {
            email: admin.email.clone(),
            panel: Some(panel),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(admin: &CurrentAdmin, message: String) -> Self {
        Self {
            email: admin.email.clone(),
            panel: None,
            error: Some(message),
        }
    }
}

/// Tab panel alone, swapped in by htmx.
#[derive(Template, WebTemplate)]
#[template(path = "_tab.html")]
pub struct TabTemplate {
    pub panel: TabPanel,
}

/// Standalone message page, used where there is no dashboard to return to.
#[derive(Template, WebTemplate)]
#[template(path = "message.html")]
pub struct MessageTemplate {
    pub title: &'static str,
    pub message: &'static str,
}

/// Tab bar plus the active tab's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPanel {
    pub active: &'static str,
    pub contact_count: usize,
    pub internship_count: usize,
    pub contacts: Vec<SubmitterGroup<ContactItem>>,
    pub internships: Vec<SubmitterGroup<InternshipItem>>,
    pub alert: Option<String>,
    pub confirm: &'static str,
}

impl TabPanel {
    #[must_use]
    pub fn new(state: &DashboardState, active: ChildKind, alert: Option<String>) -> Self {
        let (contacts, internships) = match active {
            ChildKind::Contact => (groups(state, active, contact_items), Vec::new()),
            ChildKind::Internship => (Vec::new(), groups(state, active, internship_items)),
        };
        Self {
            active: active.as_str(),
            contact_count: state.count(ChildKind::Contact),
            internship_count: state.count(ChildKind::Internship),
            contacts,
            internships,
            alert,
            confirm: CONFIRM_ACCEPT,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.internships.is_empty()
    }
}

/// One submitter's records on a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitterGroup<T> {
    pub full_name: String,
    pub email: String,
    pub last_submission: String,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub accept_url: String,
    pub phone: String,
    pub company: String,
    pub method: &'static str,
    pub details: String,
    pub requirements: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternshipItem {
    pub accept_url: String,
    pub phone: String,
    pub college: String,
    pub method: &'static str,
    pub domain: &'static str,
    pub linkedin: String,
    pub about_you: String,
    pub why_internship: String,
    pub resume_href: Option<String>,
    pub submitted_at: String,
}

fn display_time(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || "N/A".to_owned(),
        |t| t.format("%d %b %Y, %H:%M UTC").to_string(),
    )
}

fn accept_url(records: &SubmitterRecords, kind: ChildKind, id: i32) -> String {
    format!("/submissions/{}/{kind}/{id}/accept", records.submitter.id)
}

/// Link to the résumé redirect, or `None` when there is nothing to open.
#[must_use]
pub fn resume_href(application: &InternshipApplication) -> Option<String> {
    if !application.has_resume() {
        return None;
    }
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if let Some(path) = application.resume_path.as_deref().filter(|p| !p.is_empty()) {
        query.append_pair("path", path);
    }
    if let Some(url) = application.resume_url.as_deref().filter(|u| !u.is_empty()) {
        query.append_pair("url", url);
    }
    Some(format!("/resume?{}", query.finish()))
}

fn contact_items(records: &SubmitterRecords) -> Vec<ContactItem> {
    records
        .contacts
        .iter()
        .map(|c: &ContactInquiry| ContactItem {
            accept_url: accept_url(records, ChildKind::Contact, c.id.as_i32()),
            phone: c.phone.clone(),
            company: c.company.clone(),
            method: c.contact_method.as_str(),
            details: c.project_details.clone(),
            requirements: c.requirements.clone(),
            submitted_at: display_time(c.submitted_at),
        })
        .collect()
}

fn internship_items(records: &SubmitterRecords) -> Vec<InternshipItem> {
    records
        .internships
        .iter()
        .map(|a| InternshipItem {
            accept_url: accept_url(records, ChildKind::Internship, a.id.as_i32()),
            phone: a.phone.clone(),
            college: a.college.clone(),
            method: a.contact_method.as_str(),
            domain: a.domain.as_str(),
            linkedin: a.linkedin_url.clone(),
            about_you: a.about_you.clone(),
            why_internship: a.why_internship.clone(),
            resume_href: resume_href(a),
            submitted_at: display_time(a.submitted_at),
        })
        .collect()
}

fn groups<T>(
    state: &DashboardState,
    kind: ChildKind,
    items: fn(&SubmitterRecords) -> Vec<T>,
) -> Vec<SubmitterGroup<T>> {
    state
        .tab(kind)
        .map(|records| SubmitterGroup {
            full_name: records.submitter.full_name.clone(),
            email: records.submitter.email.as_str().to_owned(),
            last_submission: display_time(Some(records.submitter.last_submission_at)),
            items: items(records),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use relyce_core::{ContactMethod, InternshipApplicationId, InternshipDomain, SubmitterId};

    use super::*;

    fn application(path: Option<&str>, url: Option<&str>) -> InternshipApplication {
        InternshipApplication {
            id: InternshipApplicationId::new(7),
            submitter_id: SubmitterId::new(3),
            phone: String::new(),
            college: String::new(),
            contact_method: ContactMethod::Email,
            domain: InternshipDomain::WebDevelopment,
            linkedin_url: String::new(),
            about_you: String::new(),
            why_internship: String::new(),
            resume_path: path.map(str::to_owned),
            resume_url: url.map(str::to_owned),
            submitted_at: None,
        }
    }

    #[test]
    fn test_resume_href_encodes_both_references() {
        assert_eq!(resume_href(&application(None, None)), None);
        assert_eq!(
            resume_href(&application(Some("resumes/1_cv.pdf"), None)).unwrap(),
            "/resume?path=resumes%2F1_cv.pdf"
        );
        assert_eq!(
            resume_href(&application(Some(""), Some("https://x.test/a?b=c"))).unwrap(),
            "/resume?url=https%3A%2F%2Fx.test%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn test_missing_timestamp_shows_na() {
        assert_eq!(display_time(None), "N/A");
    }
}
