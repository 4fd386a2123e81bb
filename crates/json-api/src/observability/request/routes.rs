//! Route labels for request metrics.

const KNOWN_ROUTES: [&str; 7] = [
    "/healthcheck",
    "/rotate",
    "/rotate/upcoming",
    "/photos/today",
    "/checkout",
    "/webhook",
    "/docs",
];

/// Collapse a request path onto a bounded set of metric labels.
pub(super) fn route_label(path: &str) -> &'static str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        other => other,
    };

    KNOWN_ROUTES
        .iter()
        .find(|route| **route == trimmed)
        .copied()
        .unwrap_or("other")
}
