//! Railway API client for deployment log retrieval.
//!
//! Queries the Railway GraphQL API for the log stream of a deployment so
//! the remediation pipeline can diagnose a failure after the fact. Also
//! provides the bounded reachability probe used by the relay's health
//! endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::RemedyError;

/// Default Railway GraphQL endpoint
const DEFAULT_RAILWAY_API_URL: &str = "https://backboard.railway.app/graphql/v2";

/// Upper bound on the health probe, independent of the fetch timeout
const PROBE_TIMEOUT_SECS: u64 = 5;

const DEPLOYMENT_LOGS_QUERY: &str = r"
query deploymentLogs($deploymentId: String!, $limit: Int!) {
  deploymentLogs(deploymentId: $deploymentId, limit: $limit) {
    message
  }
}
";

/// Configuration for the Railway client
#[derive(Debug, Clone)]
pub struct RailwayConfig {
    /// Base URL for the GraphQL API
    pub base_url: String,
    /// API token sent as a bearer credential
    pub token: String,
    /// Request timeout for log queries, in seconds
    pub timeout_secs: u64,
    /// Maximum number of log lines per query
    pub default_limit: u32,
}

impl RailwayConfig {
    /// Build a configuration for the given token, honoring the
    /// `RAILWAY_API_URL` override.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: std::env::var("RAILWAY_API_URL")
                .unwrap_or_else(|_| DEFAULT_RAILWAY_API_URL.to_string()),
            token: token.into(),
            timeout_secs: 30,
            default_limit: 1000,
        }
    }
}

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct DeploymentLogsData {
    #[serde(rename = "deploymentLogs")]
    deployment_logs: Vec<LogLine>,
}

#[derive(Deserialize)]
struct LogLine {
    message: String,
}

/// Client for the Railway GraphQL API
#[derive(Debug, Clone)]
pub struct RailwayClient {
    config: RailwayConfig,
    client: reqwest::Client,
}

impl RailwayClient {
    /// Create a new Railway client with the given configuration
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be created (should never happen in practice).
    #[must_use]
    pub fn new(config: RailwayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Fetch the log stream for a deployment, joined oldest-first into a
    /// single newline-separated string.
    ///
    /// # Arguments
    /// * `deployment_id` - Railway deployment id
    /// * `limit` - Maximum number of lines to return (0 = use default)
    ///
    /// # Errors
    /// Returns an error if the request fails or the API answers with a
    /// GraphQL error payload.
    pub async fn fetch_deployment_logs(
        &self,
        deployment_id: &str,
        limit: u32,
    ) -> Result<String, RemedyError> {
        let limit = if limit == 0 {
            self.config.default_limit
        } else {
            limit
        };

        debug!(deployment_id = %deployment_id, limit = limit, "Fetching deployment logs");

        let request = GraphqlRequest {
            query: DEPLOYMENT_LOGS_QUERY,
            variables: Some(serde_json::json!({
                "deploymentId": deployment_id,
                "limit": limit,
            })),
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GraphqlResponse<DeploymentLogsData> = response.json().await?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(RemedyError::Api(messages.join("; ")));
        }

        let data = body
            .data
            .ok_or_else(|| RemedyError::Api("response contained no data".to_string()))?;

        let lines: Vec<String> = data
            .deployment_logs
            .into_iter()
            .map(|entry| entry.message)
            .collect();

        Ok(lines.join("\n"))
    }

    /// Best-effort reachability probe against the GraphQL endpoint.
    ///
    /// Bounded at 5 seconds regardless of the fetch timeout. Any HTTP
    /// response counts as reachable; only transport-level failures (DNS,
    /// connect, timeout) report unreachable.
    ///
    /// # Errors
    /// Returns an error if the endpoint could not be reached in time.
    pub async fn probe(&self) -> Result<(), RemedyError> {
        let request = GraphqlRequest {
            query: "{ __typename }",
            variables: None,
        };

        self.client
            .post(&self.config.base_url)
            .bearer_auth(&self.config.token)
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .json(&request)
            .send()
            .await?;

        Ok(())
    }
}
