//! Business logic behind the form handlers.

pub mod ingest;

pub use ingest::{IngestError, submit_contact, submit_internship};
