//! Configuration for the relay service.

use std::env;

use crate::store::DEFAULT_CAPACITY;

/// Operating mode for the webhook dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    /// Store and classify notifications; never trigger remediation.
    NotifyOnly,
    /// Additionally launch the auto-fix pipeline for failed deployments.
    AutoFix,
}

impl OperatingMode {
    /// Whether failure events dispatch the remediation pipeline.
    #[must_use]
    pub const fn is_auto_fix(self) -> bool {
        matches!(self, Self::AutoFix)
    }
}

/// Relay service configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Shared secret for protected routes; `None` means open mode.
    pub auth_token: Option<String>,
    /// Dispatcher operating mode.
    pub mode: OperatingMode,
    /// Railway API token. Required in auto-fix mode.
    pub railway_token: Option<String>,
    /// Repository slug included in remediation prompts.
    pub github_repo: Option<String>,
    /// Local workspace the fix agent operates in.
    pub repo_path: String,
    /// Bound on the notification history.
    pub max_notifications: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            auth_token: env::var("WEBHOOK_AUTH_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            mode: if env::var("AUTO_FIX_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false)
            {
                OperatingMode::AutoFix
            } else {
                OperatingMode::NotifyOnly
            },
            railway_token: env::var("RAILWAY_TOKEN").ok().filter(|s| !s.is_empty()),
            github_repo: env::var("GITHUB_REPO").ok(),
            repo_path: env::var("LOCAL_REPO_PATH").unwrap_or_else(|_| ".".to_string()),
            max_notifications: env::var("MAX_NOTIFICATIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("PORT");
        env::remove_var("WEBHOOK_AUTH_TOKEN");
        env::remove_var("AUTO_FIX_ENABLED");
        env::remove_var("RAILWAY_TOKEN");
        env::remove_var("GITHUB_REPO");
        env::remove_var("LOCAL_REPO_PATH");
        env::remove_var("MAX_NOTIFICATIONS");
    }

    #[test]
    fn test_default_config() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert!(config.auth_token.is_none());
        assert_eq!(config.mode, OperatingMode::NotifyOnly);
        assert!(config.railway_token.is_none());
        assert_eq!(config.repo_path, ".");
        assert_eq!(config.max_notifications, 50);
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("PORT", "9000");
        env::set_var("WEBHOOK_AUTH_TOKEN", "secret");
        env::set_var("AUTO_FIX_ENABLED", "true");
        env::set_var("RAILWAY_TOKEN", "rw-token");

        let config = Config::default();
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_token, Some("secret".to_string()));
        assert_eq!(config.mode, OperatingMode::AutoFix);
        assert_eq!(config.railway_token, Some("rw-token".to_string()));

        clear_env();
    }

    #[test]
    fn test_empty_auth_token_means_open_mode() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("WEBHOOK_AUTH_TOKEN", "");
        let config = Config::default();
        assert!(config.auth_token.is_none());

        clear_env();
    }

    #[test]
    fn test_auto_fix_accepts_numeric_flag() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("AUTO_FIX_ENABLED", "1");
        assert_eq!(Config::default().mode, OperatingMode::AutoFix);

        env::set_var("AUTO_FIX_ENABLED", "false");
        assert_eq!(Config::default().mode, OperatingMode::NotifyOnly);

        clear_env();
    }
}
