//! Webhook payload access and event classification.
//!
//! Payloads are schema-tolerant `serde_json::Value` documents: only the
//! `event`, `deployment.id` and `service.name` fields are interpreted,
//! everything else is carried into the notification store untouched.
//! Missing optional fields never reject a payload; accessors fall back
//! to an empty string.

use serde_json::Value;

/// Event name Railway sends for a failed deployment.
pub const DEPLOYMENT_FAILED: &str = "deployment.failed";

/// Placeholder used in responses when the event name is absent.
pub const UNKNOWN_EVENT: &str = "unknown";

/// Read the `event` field.
#[must_use]
pub fn event_type(payload: &Value) -> Option<&str> {
    payload.get("event").and_then(Value::as_str)
}

/// Read `deployment.id`, empty string when absent.
#[must_use]
pub fn deployment_id(payload: &Value) -> String {
    payload
        .get("deployment")
        .and_then(|d| d.get("id"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Read `service.name`, empty string when absent.
#[must_use]
pub fn service_name(payload: &Value) -> String {
    payload
        .get("service")
        .and_then(|s| s.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Classified webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A deployment failed; carries whatever identifiers were present.
    DeploymentFailed {
        /// `deployment.id`, empty when absent
        deployment_id: String,
        /// `service.name`, empty when absent
        service_name: String,
    },
    /// Anything else, including payloads without an `event` field.
    Other(String),
}

/// Classify a payload by its `event` field.
#[must_use]
pub fn classify(payload: &Value) -> WebhookEvent {
    match event_type(payload) {
        Some(DEPLOYMENT_FAILED) => WebhookEvent::DeploymentFailed {
            deployment_id: deployment_id(payload),
            service_name: service_name(payload),
        },
        Some(other) => WebhookEvent::Other(other.to_string()),
        None => WebhookEvent::Other(UNKNOWN_EVENT.to_string()),
    }
}
