//! Fix-agent process launch.
//!
//! Writes the rendered prompt as an artifact file under the workspace and
//! spawns the Cursor agent against it. The child is deliberately not
//! awaited: the contract is launch success, and the request that caused
//! the run has already been answered.

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::info;

use crate::error::RemedyError;

/// Directory under the workspace that holds prompt artifacts
const ARTIFACT_DIR: &str = ".relay";

/// Default fix-agent binary
const DEFAULT_AGENT_BIN: &str = "cursor-agent";

/// Launches the Cursor fix agent against a local workspace.
#[derive(Debug, Clone)]
pub struct CursorLauncher {
    /// Workspace directory the agent operates in
    workspace: PathBuf,
    /// Binary to invoke
    agent_bin: String,
}

impl CursorLauncher {
    /// Create a launcher for the given workspace, honoring the
    /// `CURSOR_AGENT_BIN` override.
    #[must_use]
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            agent_bin: std::env::var("CURSOR_AGENT_BIN")
                .unwrap_or_else(|_| DEFAULT_AGENT_BIN.to_string()),
        }
    }

    /// Override the agent binary.
    #[must_use]
    pub fn with_agent_bin(mut self, bin: impl Into<String>) -> Self {
        self.agent_bin = bin.into();
        self
    }

    /// Write the prompt artifact under the workspace and return its path.
    pub fn write_prompt_artifact(&self, label: &str, prompt: &str) -> Result<PathBuf, RemedyError> {
        let artifact_dir = self.workspace.join(ARTIFACT_DIR);
        std::fs::create_dir_all(&artifact_dir)?;

        let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let path = artifact_dir.join(format!("fix-{label}-{timestamp}.md"));
        std::fs::write(&path, prompt)?;

        Ok(path)
    }

    /// Spawn the fix agent with the prompt artifact.
    ///
    /// # Errors
    /// Returns an error if the process could not be spawned.
    pub fn launch(&self, prompt_path: &Path) -> Result<(), RemedyError> {
        let child = Command::new(&self.agent_bin)
            .arg("--workspace")
            .arg(&self.workspace)
            .arg("--prompt-file")
            .arg(prompt_path)
            .current_dir(&self.workspace)
            .spawn()
            .map_err(|e| {
                RemedyError::Launch(format!(
                    "{e}. Is '{}' in PATH?",
                    self.agent_bin
                ))
            })?;

        info!(
            pid = child.id(),
            workspace = %self.workspace.display(),
            "Fix agent launched"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_workspace() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("remedy-launcher-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_prompt_artifact() {
        let launcher = CursorLauncher::new(temp_workspace());
        let path = launcher
            .write_prompt_artifact("dep-1", "# Fix it\n")
            .unwrap();

        assert!(path.to_string_lossy().contains("fix-dep-1-"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Fix it\n");
    }

    #[tokio::test]
    async fn test_launch_with_available_binary() {
        let workspace = temp_workspace();
        let launcher = CursorLauncher::new(&workspace).with_agent_bin("true");
        let path = launcher.write_prompt_artifact("dep-2", "prompt").unwrap();

        assert!(launcher.launch(&path).is_ok());
    }

    #[tokio::test]
    async fn test_launch_with_missing_binary() {
        let workspace = temp_workspace();
        let launcher =
            CursorLauncher::new(&workspace).with_agent_bin("definitely-not-a-real-binary");
        let path = launcher.write_prompt_artifact("dep-3", "prompt").unwrap();

        let err = launcher.launch(&path).unwrap_err();
        assert!(matches!(err, RemedyError::Launch(_)));
    }
}
