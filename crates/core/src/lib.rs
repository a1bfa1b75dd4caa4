//! Relyce Core - Shared types library.
//!
//! This crate provides common types used across all Relyce components:
//! - `site` - Public marketing site with the lead-capture forms
//! - `admin` - Internal dashboard for reviewing submissions
//! - `cli` - Command-line tools for migrations and allow-list management
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, enumerations, form validation and records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
