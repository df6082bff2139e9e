//! Error types for the remediation pipeline.

use thiserror::Error;

/// Errors that can occur while preparing or launching a remediation run.
#[derive(Debug, Error)]
pub enum RemedyError {
    /// HTTP request to the Railway API failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Railway API answered with an error payload
    #[error("Railway API error: {0}")]
    Api(String),

    /// Neither a deployment id nor raw logs were provided
    #[error("neither deployment_id nor logs were provided")]
    MissingInput,

    /// The deployment has no retrievable logs
    #[error("no logs available for deployment {0}")]
    NoLogs(String),

    /// Prompt rendering failed
    #[error("prompt rendering failed: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Filesystem error while writing the prompt artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fix agent process could not be spawned
    #[error("failed to launch fix agent: {0}")]
    Launch(String),
}
