//! Core types for Relyce.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod record;
pub mod status;
pub mod submission;

pub use email::{Email, EmailError};
pub use id::*;
pub use record::*;
pub use status::*;
pub use submission::{
    ContactForm, ContactSubmission, FieldErrors, InternshipForm, InternshipSubmission,
    ResumeError, ResumeFile, check_resume, resume_object_path, sanitize_file_name,
};
