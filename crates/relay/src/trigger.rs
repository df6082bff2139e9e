//! Fire-and-forget remediation dispatch.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

/// Seam between the webhook dispatcher and the remediation pipeline.
///
/// Implementations report success as a `bool`; the dispatcher never
/// waits on or reacts to the outcome beyond a log line.
#[async_trait]
pub trait RemediationTrigger: Send + Sync {
    /// Run one remediation attempt for the given deployment and/or logs.
    async fn run_remediation(&self, deployment_id: Option<String>, logs: Option<String>) -> bool;
}

#[async_trait]
impl RemediationTrigger for remedy::RemediationRunner {
    async fn run_remediation(&self, deployment_id: Option<String>, logs: Option<String>) -> bool {
        self.run(deployment_id.as_deref(), logs).await
    }
}

/// Dispatch a remediation run on a detached task.
///
/// Returns as soon as the task is spawned; the HTTP response does not
/// wait for the run. Concurrent failure events for the same deployment
/// each get their own run: there is no deduplication or per-deployment
/// serialization.
pub fn spawn_remediation(
    trigger: Arc<dyn RemediationTrigger>,
    deployment_id: Option<String>,
    logs: Option<String>,
) {
    tokio::spawn(async move {
        let label = deployment_id.clone().unwrap_or_else(|| "<manual>".to_string());
        if trigger.run_remediation(deployment_id, logs).await {
            info!(deployment_id = %label, "Remediation run finished");
        } else {
            warn!(deployment_id = %label, "Remediation run failed");
        }
    });
}
