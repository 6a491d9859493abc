//! Runbook service settings.
//!
//! Read from the process environment only when some checklist actually
//! needs the service.

use std::time::Duration;

use crate::error::{PreflightError, Result};

/// Base URL of the runbook service.
pub const RUNBOOK_URL_VAR: &str = "PREFLIGHT_RUNBOOK_URL";

/// Bearer token for the runbook service.
pub const RUNBOOK_TOKEN_VAR: &str = "PREFLIGHT_RUNBOOK_TOKEN";

/// Request timeout in seconds.
pub const RUNBOOK_TIMEOUT_VAR: &str = "PREFLIGHT_RUNBOOK_TIMEOUT";

/// Default request timeout.
pub const DEFAULT_RUNBOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// How to reach the runbook service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunbookSettings {
    /// Service base URL, without trailing slash.
    pub base_url: String,
    /// Optional bearer token.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RunbookSettings {
    /// Create settings for a base URL with default timeout and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: DEFAULT_RUNBOOK_TIMEOUT,
        }
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| std::env::var(key))
    }

    /// Read settings with a custom env var lookup function.
    ///
    /// # Errors
    ///
    /// Returns `RunbookConfig` when the URL is missing or the timeout
    /// isn't a positive number of seconds.
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let base_url = lookup(RUNBOOK_URL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| PreflightError::RunbookConfig {
                message: format!("{} is not set", RUNBOOK_URL_VAR),
            })?;

        let mut settings = Self::new(base_url.trim());
        settings.token = lookup(RUNBOOK_TOKEN_VAR)
            .ok()
            .filter(|v| !v.is_empty());

        if let Ok(raw) = lookup(RUNBOOK_TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| PreflightError::RunbookConfig {
                    message: format!(
                        "{} must be a positive number of seconds, got '{}'",
                        RUNBOOK_TIMEOUT_VAR, raw
                    ),
                })?;
            settings.timeout = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
