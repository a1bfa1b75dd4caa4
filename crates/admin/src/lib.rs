//! Relyce admin dashboard.
//!
//! Google sign-in gated by the admin allow-list, a two-tab view of every
//! submitter's contact inquiries and internship applications, accept &
//! remove, résumé links and an `.xlsx` export. Exposed as a library so the
//! router can be driven by tests against the in-memory backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::router;
pub use state::{AppState, Backends};
