//! Remediation pipeline for failed Railway deployments.
//!
//! The pipeline runs off the request path, fire-and-forget: fetch the
//! deployment's logs from the Railway API (unless the caller already has
//! them), extract error lines, render a fix prompt, and launch the local
//! Cursor agent against the configured workspace.
//!
//! Every step is fault-isolated. [`RemediationRunner::run`] reports
//! success as a `bool` and never propagates errors: nothing is waiting on
//! the result beyond a log line.

pub mod error;
pub mod extract;
pub mod launcher;
pub mod prompt;
pub mod railway;

pub use error::RemedyError;
pub use launcher::CursorLauncher;
pub use prompt::FixContext;
pub use railway::{RailwayClient, RailwayConfig};

use tracing::{error, info};
use uuid::Uuid;

/// Lines of raw log carried into the prompt excerpt
const LOG_EXCERPT_LINES: usize = 100;

/// Orchestrates one remediation run end to end.
pub struct RemediationRunner {
    railway: Option<RailwayClient>,
    launcher: CursorLauncher,
    repository: Option<String>,
}

impl RemediationRunner {
    /// Create a runner. `railway` may be absent (notify-only deployments
    /// without an API token); runs that need a log fetch then fail fast.
    #[must_use]
    pub fn new(
        railway: Option<RailwayClient>,
        launcher: CursorLauncher,
        repository: Option<String>,
    ) -> Self {
        Self {
            railway,
            launcher,
            repository,
        }
    }

    /// Run the remediation pipeline. Returns whether the fix agent was
    /// launched. All failures are logged and converted to `false`.
    pub async fn run(&self, deployment_id: Option<&str>, logs: Option<String>) -> bool {
        let label = deployment_id.unwrap_or("<logs only>");
        info!(deployment_id = %label, "Starting remediation run");

        match self.try_run(deployment_id, logs).await {
            Ok(()) => {
                info!(deployment_id = %label, "Fix agent launched");
                true
            }
            Err(e) => {
                error!(deployment_id = %label, error = %e, "Remediation run failed");
                false
            }
        }
    }

    async fn try_run(
        &self,
        deployment_id: Option<&str>,
        logs: Option<String>,
    ) -> Result<(), RemedyError> {
        // Caller-supplied logs win; otherwise fetch by deployment id.
        let logs = match logs.filter(|l| !l.trim().is_empty()) {
            Some(logs) => logs,
            None => {
                let Some(id) = deployment_id else {
                    return Err(RemedyError::MissingInput);
                };
                let Some(railway) = &self.railway else {
                    return Err(RemedyError::Api(
                        "Railway client not configured".to_string(),
                    ));
                };
                let fetched = railway.fetch_deployment_logs(id, 0).await?;
                if fetched.trim().is_empty() {
                    return Err(RemedyError::NoLogs(id.to_string()));
                }
                fetched
            }
        };

        let errors = extract::extract_errors(&logs);
        info!(error_lines = errors.len(), "Extracted error candidates");

        let context = FixContext {
            deployment_id: deployment_id.unwrap_or_default().to_string(),
            repository: self.repository.clone().unwrap_or_default(),
            errors,
            log_excerpt: extract::tail(&logs, LOG_EXCERPT_LINES),
        };

        let rendered = prompt::render_fix_prompt(&context)?;

        let label =
            deployment_id.map_or_else(|| format!("manual-{}", Uuid::new_v4()), ToString::to_string);
        let artifact = self.launcher.write_prompt_artifact(&label, &rendered)?;
        info!(artifact = %artifact.display(), "Wrote remediation prompt");

        self.launcher.launch(&artifact)
    }
}
