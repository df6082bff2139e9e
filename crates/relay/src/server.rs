//! HTTP surface for the relay service.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::authorize;
use crate::config::Config;
use crate::store::NotificationStore;
use crate::trigger::{spawn_remediation, RemediationTrigger};
use crate::webhooks::{self, WebhookEvent};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Notification history.
    pub store: Arc<NotificationStore>,
    /// Remediation dispatch seam.
    pub trigger: Arc<dyn RemediationTrigger>,
    /// Railway client used by the health probe, when a token is configured.
    pub railway: Option<remedy::RailwayClient>,
}

/// Build the HTTP router for the relay service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/notifications", get(notifications_handler))
        .route("/webhook", post(webhook_handler))
        .route("/manual-fix", post(manual_fix_handler))
        .route("/clear-notifications", post(clear_notifications_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

type ApiResponse = (StatusCode, Json<Value>);

/// Reject the request unless it carries the configured bearer secret.
fn require_auth(headers: &HeaderMap, config: &Config) -> Result<(), ApiResponse> {
    let provided = headers.get("authorization").and_then(|v| v.to_str().ok());

    if authorize(provided, config.auth_token.as_deref()) {
        Ok(())
    } else {
        warn!("Unauthorized request rejected");
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        ))
    }
}

/// Health check endpoint.
///
/// Health means process liveness: an unreachable Railway API only changes
/// the message, never the status.
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let message = match &state.railway {
        Some(client) => match client.probe().await {
            Ok(()) => "Railway API reachable".to_string(),
            Err(e) => {
                warn!(error = %e, "Railway API probe failed");
                format!("Railway API unreachable: {e}")
            }
        },
        None => "Railway API probe skipped (no token configured)".to_string(),
    };

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "message": message,
    }))
}

/// List the stored notifications.
async fn notifications_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse {
    if let Err(resp) = require_auth(&headers, &state.config) {
        return resp;
    }

    let (notifications, count) = state.store.snapshot().await;
    (
        StatusCode::OK,
        Json(json!({ "notifications": notifications, "count": count })),
    )
}

/// Webhook endpoint for Railway deployment notifications.
///
/// The payload is stored before classification in both operating modes,
/// so even unexpected event types leave an audit trail and a
/// classification failure cannot lose history of earlier deliveries.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    if let Err(resp) = require_auth(&headers, &state.config) {
        return resp;
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) if payload.is_object() => payload,
        _ => {
            warn!("Invalid webhook payload - not a JSON document");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON payload" })),
            );
        }
    };

    info!(
        event = %webhooks::event_type(&payload).unwrap_or(webhooks::UNKNOWN_EVENT),
        "Received webhook"
    );

    state.store.append(payload.clone()).await;

    match process_webhook(&state, &payload) {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => {
            error!(error = %e, "Error processing webhook");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}

/// Classify an already-stored payload and, in auto-fix mode, dispatch the
/// remediation pipeline for failed deployments.
fn process_webhook(state: &AppState, payload: &Value) -> anyhow::Result<Value> {
    match webhooks::classify(payload) {
        WebhookEvent::DeploymentFailed {
            deployment_id,
            service_name,
        } => {
            info!(
                deployment_id = %deployment_id,
                service = %service_name,
                "Detected failed deployment"
            );

            if state.config.mode.is_auto_fix() {
                spawn_remediation(
                    Arc::clone(&state.trigger),
                    Some(deployment_id.clone()).filter(|id| !id.is_empty()),
                    None,
                );
                Ok(json!({
                    "status": "processing",
                    "message": format!("Cursor auto-fix started for deployment {deployment_id}"),
                }))
            } else {
                Ok(json!({
                    "status": "received",
                    "message": format!("Notification received for failed deployment {deployment_id}"),
                }))
            }
        }
        WebhookEvent::Other(event) => {
            info!(event = %event, "Received non-failure event");

            if state.config.mode.is_auto_fix() {
                Ok(json!({
                    "status": "ignored",
                    "message": format!("Ignoring non-failure event {event}"),
                }))
            } else {
                Ok(json!({
                    "status": "received",
                    "message": format!("Notification received for event {event}"),
                }))
            }
        }
    }
}

/// Request body for a manual remediation trigger.
#[derive(Debug, Deserialize)]
struct ManualFixRequest {
    /// Deployment to fetch logs for
    #[serde(default)]
    deployment_id: Option<String>,
    /// Raw logs; supplying them bypasses the Railway fetch
    #[serde(default)]
    logs: Option<String>,
}

/// Manually trigger the remediation pipeline.
///
/// Requires a deployment id, raw logs, or both. Responds before the run
/// completes.
async fn manual_fix_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResponse {
    if let Err(resp) = require_auth(&headers, &state.config) {
        return resp;
    }

    let Ok(request) = serde_json::from_slice::<ManualFixRequest>(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid JSON payload" })),
        );
    };

    let deployment_id = request.deployment_id.filter(|s| !s.is_empty());
    let logs = request.logs.filter(|s| !s.is_empty());

    if deployment_id.is_none() && logs.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Either deployment_id or logs must be provided" })),
        );
    }

    let label = deployment_id.clone().unwrap_or_else(|| "manual".to_string());
    info!(deployment_id = %label, "Manual fix requested");

    spawn_remediation(Arc::clone(&state.trigger), deployment_id, logs);

    (
        StatusCode::OK,
        Json(json!({
            "status": "processing",
            "message": format!("Cursor auto-fix started for deployment {label}"),
        })),
    )
}

/// Clear the notification history.
async fn clear_notifications_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResponse {
    if let Err(resp) = require_auth(&headers, &state.config) {
        return resp;
    }

    let removed = state.store.clear().await;
    info!(removed = removed, "Notifications cleared");

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": format!("Cleared {removed} notifications"),
        })),
    )
}
