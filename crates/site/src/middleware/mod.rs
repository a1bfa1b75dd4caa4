//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. Security headers
//! 5. Rate limiting on form POSTs only (governor)

pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::form_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
