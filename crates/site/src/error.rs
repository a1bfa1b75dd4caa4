//! Error reporting helpers.
//!
//! Form handlers render their own failure banners, so the site has no
//! response-level error type; failures are logged and reported to Sentry
//! through the tracing layer. Breadcrumbs add the trail of user actions
//! leading up to an event.

/// Add a breadcrumb for a user action.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}
