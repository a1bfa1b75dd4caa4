//! Middleware for admin.

pub mod auth;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAdmin, RequireAdmin, clear_session, set_current_admin};
pub use security_headers::with_security_headers;
pub use session::{create_session_layer, session_store};
