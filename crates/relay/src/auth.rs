//! Bearer-secret authorization for protected routes.

/// Check a request's `Authorization` header against the configured secret.
///
/// With no secret configured every request is authorized. Open mode is a
/// deliberate operational trade-off for local deployments; operators
/// exposing the relay publicly must set `WEBHOOK_AUTH_TOKEN`.
///
/// With a secret configured the header must equal `Bearer <secret>`
/// exactly. A missing header, a different scheme, a wrong token, or
/// extra whitespace is rejected.
#[must_use]
pub fn authorize(provided: Option<&str>, secret: Option<&str>) -> bool {
    match secret {
        None => true,
        Some(secret) => provided.is_some_and(|header| header == format!("Bearer {secret}")),
    }
}
