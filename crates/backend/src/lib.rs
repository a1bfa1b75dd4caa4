//! Relyce Backend - storage capabilities behind the site and the dashboard.
//!
//! - [`db`] - Submitters, their contact and internship records, and the
//!   admin allow-list, in `PostgreSQL`
//! - [`storage`] - Uploaded objects on the local filesystem with HMAC-signed
//!   download links
//! - [`config`] - Environment helpers shared by every binary
//!
//! Both stores sit behind traits ([`db::SubmissionStore`],
//! [`db::AdminUserStore`], [`storage::ObjectStore`]) so handlers and services
//! can be exercised against the in-memory implementations in `memory`
//! (enabled with the `memory` feature).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod storage;

pub use db::{AdminUserStore, RepositoryError, SubmissionStore};
pub use storage::{ObjectStore, StorageError};
