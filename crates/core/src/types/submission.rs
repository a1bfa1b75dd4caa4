//! Lead-capture form input and its validation.
//!
//! Validation is purely local and runs before any backend call. A form that
//! fails validation produces [`FieldErrors`] keyed by form field name, and
//! the caller must not touch the database or object storage.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use super::email::Email;
use super::status::{ContactMethod, InternshipDomain};

/// Minimum length of the free-text fields on both forms.
pub const MIN_FREE_TEXT_CHARS: usize = 10;

/// Minimum length of a phone number.
pub const MIN_PHONE_CHARS: usize = 10;

/// Largest résumé accepted, in bytes (5 MiB).
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// The only accepted résumé content type.
pub const RESUME_CONTENT_TYPE: &str = "application/pdf";

/// Object-store namespace for uploaded résumés.
pub const RESUME_NAMESPACE: &str = "resumes";

/// Field-level validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }

    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, Self> {
        if self.is_empty() {
            // Every field parsed, so the builder always yields a value here.
            value().ok_or(self)
        } else {
            Err(self)
        }
    }
}

fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

fn required(value: &str) -> bool {
    !value.trim().is_empty()
}

// =============================================================================
// Contact form
// =============================================================================

/// Raw contact form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub contact_method: String,
    pub project_details: String,
    pub requirements: String,
}

/// A contact form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub full_name: String,
    pub email: Email,
    pub company: String,
    pub phone: String,
    pub contact_method: ContactMethod,
    pub project_details: String,
    pub requirements: String,
}

impl ContactForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] if any field violates its constraint.
    pub fn validate(&self) -> Result<ContactSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        if !required(&self.full_name) {
            errors.add("full_name", "Full name is required");
        }
        let email = Email::parse(&self.email).ok();
        if email.is_none() {
            errors.add("email", "Please enter a valid email");
        }
        if !required(&self.company) {
            errors.add("company", "Company name is required");
        }
        if !has_min_chars(&self.phone, MIN_PHONE_CHARS) {
            errors.add("phone", "Please enter a valid phone number");
        }
        let contact_method = self.contact_method.parse::<ContactMethod>().ok();
        if contact_method.is_none() {
            errors.add("contact_method", "Please select a contact method");
        }
        if !has_min_chars(&self.project_details, MIN_FREE_TEXT_CHARS) {
            errors.add("project_details", "Please provide at least 10 characters");
        }
        if !has_min_chars(&self.requirements, MIN_FREE_TEXT_CHARS) {
            errors.add("requirements", "Please provide at least 10 characters");
        }

        errors.into_result(|| {
            Some(ContactSubmission {
                full_name: self.full_name.trim().to_owned(),
                email: email?,
                company: self.company.trim().to_owned(),
                phone: self.phone.trim().to_owned(),
                contact_method: contact_method?,
                project_details: self.project_details.trim().to_owned(),
                requirements: self.requirements.trim().to_owned(),
            })
        })
    }
}

// =============================================================================
// Internship form
// =============================================================================

/// Raw internship form fields (the résumé travels separately).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InternshipForm {
    pub email: String,
    pub full_name: String,
    pub college: String,
    pub phone: String,
    pub contact_method: String,
    pub domain: String,
    pub linkedin: String,
    pub about_you: String,
    pub why_internship: String,
}

/// An internship form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternshipSubmission {
    pub email: Email,
    pub full_name: String,
    pub college: String,
    pub phone: String,
    pub contact_method: ContactMethod,
    pub domain: InternshipDomain,
    pub linkedin: Url,
    pub about_you: String,
    pub why_internship: String,
}

fn parse_web_url(value: &str) -> Option<Url> {
    Url::parse(value.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
}

impl InternshipForm {
    /// Validate every field, collecting all failures.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] if any field violates its constraint.
    pub fn validate(&self) -> Result<InternshipSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = Email::parse(&self.email).ok();
        if email.is_none() {
            errors.add("email", "Enter a valid email");
        }
        if !required(&self.full_name) {
            errors.add("full_name", "Full name is required");
        }
        if !required(&self.college) {
            errors.add("college", "College name is required");
        }
        if !has_min_chars(&self.phone, MIN_PHONE_CHARS) {
            errors.add("phone", "Phone number is required");
        }
        let contact_method = self.contact_method.parse::<ContactMethod>().ok();
        if contact_method.is_none() {
            errors.add("contact_method", "Select a contact method");
        }
        let domain = self.domain.parse::<InternshipDomain>().ok();
        if domain.is_none() {
            errors.add("domain", "Select a preferred domain");
        }
        let linkedin = parse_web_url(&self.linkedin);
        if linkedin.is_none() {
            errors.add("linkedin", "Enter a valid LinkedIn URL");
        }
        if !has_min_chars(&self.about_you, MIN_FREE_TEXT_CHARS) {
            errors.add(
                "about_you",
                "Please tell us about yourself (min 10 characters)",
            );
        }
        if !has_min_chars(&self.why_internship, MIN_FREE_TEXT_CHARS) {
            errors.add(
                "why_internship",
                "Please explain why you want this internship (min 10 characters)",
            );
        }

        errors.into_result(|| {
            Some(InternshipSubmission {
                email: email?,
                full_name: self.full_name.trim().to_owned(),
                college: self.college.trim().to_owned(),
                phone: self.phone.trim().to_owned(),
                contact_method: contact_method?,
                domain: domain?,
                linkedin: linkedin?,
                about_you: self.about_you.trim().to_owned(),
                why_internship: self.why_internship.trim().to_owned(),
            })
        })
    }
}

// =============================================================================
// Résumé attachment
// =============================================================================

/// An uploaded résumé, as received from the browser.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Why a résumé was rejected before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResumeError {
    #[error("Please upload your resume (PDF only)")]
    Missing,
    #[error("Only PDF files are accepted.")]
    NotPdf,
    #[error("Max file size is 5MB.")]
    TooLarge,
}

/// Check presence, type and size, in that order.
///
/// # Errors
///
/// Returns the first [`ResumeError`] that applies.
pub fn check_resume(file: Option<&ResumeFile>) -> Result<&ResumeFile, ResumeError> {
    let file = file
        .filter(|f| !f.file_name.is_empty() || !f.bytes.is_empty())
        .ok_or(ResumeError::Missing)?;
    if file.content_type != RESUME_CONTENT_TYPE {
        return Err(ResumeError::NotPdf);
    }
    if file.bytes.len() > MAX_RESUME_BYTES {
        return Err(ResumeError::TooLarge);
    }
    Ok(file)
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object path for a résumé uploaded at `unix_millis`.
#[must_use]
pub fn resume_object_path(unix_millis: i64, file_name: &str) -> String {
    format!(
        "{RESUME_NAMESPACE}/{unix_millis}_{}",
        sanitize_file_name(file_name)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_contact() -> ContactForm {
        ContactForm {
            full_name: "Arun Kumar".to_owned(),
            email: "arun@example.com".to_owned(),
            company: "Kumar Textiles".to_owned(),
            phone: "9876543210".to_owned(),
            contact_method: "WhatsApp".to_owned(),
            project_details: "An online catalogue for our shop".to_owned(),
            requirements: "Product pages and an enquiry form".to_owned(),
        }
    }

    fn valid_internship() -> InternshipForm {
        InternshipForm {
            email: "meera@college.edu".to_owned(),
            full_name: "Meera S".to_owned(),
            college: "Anna University".to_owned(),
            phone: "9123456780".to_owned(),
            contact_method: "Email".to_owned(),
            domain: "AI Engineer".to_owned(),
            linkedin: "https://www.linkedin.com/in/meera".to_owned(),
            about_you: "Final year CSE student who loves ML".to_owned(),
            why_internship: "To work on production systems".to_owned(),
        }
    }

    #[test]
    fn test_valid_contact_form() {
        let submission = valid_contact().validate().unwrap();
        assert_eq!(submission.contact_method, ContactMethod::WhatsApp);
        assert_eq!(submission.email.as_str(), "arun@example.com");
    }

    #[test]
    fn test_contact_short_free_text_reports_field_errors() {
        let form = ContactForm {
            project_details: "too short".to_owned(),
            requirements: "tiny".to_owned(),
            ..valid_contact()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("project_details"),
            Some("Please provide at least 10 characters")
        );
        assert!(errors.get("requirements").is_some());
    }

    #[test]
    fn test_contact_empty_form_reports_every_field() {
        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 7);
        assert_eq!(errors.get("contact_method"), Some("Please select a contact method"));
    }

    #[test]
    fn test_free_text_length_ignores_surrounding_whitespace() {
        let form = ContactForm {
            requirements: "   123456789   ".to_owned(),
            ..valid_contact()
        };
        assert!(form.validate().unwrap_err().get("requirements").is_some());
    }

    #[test]
    fn test_valid_internship_form() {
        let submission = valid_internship().validate().unwrap();
        assert_eq!(submission.domain, InternshipDomain::AiEngineer);
        assert_eq!(submission.linkedin.host_str(), Some("www.linkedin.com"));
    }

    #[test]
    fn test_internship_rejects_non_web_url_and_unknown_domain() {
        let form = InternshipForm {
            linkedin: "linkedin.com/in/meera".to_owned(),
            domain: "Blockchain".to_owned(),
            ..valid_internship()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("linkedin"), Some("Enter a valid LinkedIn URL"));
        assert_eq!(errors.get("domain"), Some("Select a preferred domain"));

        let form = InternshipForm {
            linkedin: "mailto:meera@college.edu".to_owned(),
            ..valid_internship()
        };
        assert!(form.validate().unwrap_err().get("linkedin").is_some());
    }

    fn pdf(size: usize) -> ResumeFile {
        ResumeFile {
            file_name: "resume.pdf".to_owned(),
            content_type: RESUME_CONTENT_TYPE.to_owned(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn test_check_resume_order() {
        assert_eq!(check_resume(None).unwrap_err(), ResumeError::Missing);

        let docx = ResumeFile {
            content_type: "application/msword".to_owned(),
            bytes: vec![0; MAX_RESUME_BYTES + 1],
            ..pdf(0)
        };
        // Type is checked before size.
        assert_eq!(check_resume(Some(&docx)).unwrap_err(), ResumeError::NotPdf);

        let big = pdf(MAX_RESUME_BYTES + 1);
        assert_eq!(check_resume(Some(&big)).unwrap_err(), ResumeError::TooLarge);

        let exact = pdf(MAX_RESUME_BYTES);
        assert!(check_resume(Some(&exact)).is_ok());
    }

    #[test]
    fn test_check_resume_treats_empty_part_as_missing() {
        let empty = ResumeFile {
            file_name: String::new(),
            content_type: "application/octet-stream".to_owned(),
            bytes: Vec::new(),
        };
        assert_eq!(check_resume(Some(&empty)).unwrap_err(), ResumeError::Missing);
    }

    #[test]
    fn test_resume_error_messages() {
        assert_eq!(ResumeError::NotPdf.to_string(), "Only PDF files are accepted.");
        assert_eq!(ResumeError::TooLarge.to_string(), "Max file size is 5MB.");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My CV (final).pdf"), "My_CV__final_.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("résumé.pdf"), "r_sum_.pdf");
    }

    #[test]
    fn test_resume_object_path() {
        assert_eq!(
            resume_object_path(1_718_000_000_000, "cv 2024.pdf"),
            "resumes/1718000000000_cv_2024.pdf"
        );
    }
}
