//! Relyce Infotech public site.
//!
//! Marketing pages plus the two lead-capture forms. Exposed as a library so
//! the router can be driven by tests against the in-memory backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::router;
pub use state::AppState;
