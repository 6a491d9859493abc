//! Error types for preflighter operations.
//!
//! This module defines [`PreflightError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Loading, remote fetch and missing tool errors are fatal and end the run
//! - Environment resolution collects every failure before giving up
//! - Per-item check failures are recorded on the item, never raised here
//! - Use `anyhow::Error` (via `PreflightError::Other`) for unexpected errors

use std::collections::BTreeSet;
use std::path::PathBuf;
use thiserror::Error;

/// A single failed environment requirement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvResolutionError {
    /// A `${...}` marker's command could not be run or exited non-zero.
    #[error("Unable to execute '{command}': {message}")]
    CommandFailed { command: String, message: String },

    /// A `<` marker's variable is unset or empty in the process environment.
    #[error("Missing required {name} environment variable")]
    MissingVariable { name: String },
}

/// Core error type for preflighter operations.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// No checklist sources were given.
    #[error("Please specify one or more checklists to process")]
    NoChecklists,

    /// Checklist file not found at the given location.
    #[error("Checklist not found: {path}")]
    ChecklistNotFound { path: PathBuf },

    /// Failed to parse a checklist file.
    #[error("Failed to parse checklist at {path}: {message}")]
    ChecklistParseError { path: PathBuf, message: String },

    /// One or more environment requirements could not be resolved.
    #[error("{} environment requirement(s) could not be resolved", .0.len())]
    EnvResolution(Vec<EnvResolutionError>),

    /// The runbook client could not be configured.
    #[error("Could not use runbook: {message}")]
    RunbookConfig { message: String },

    /// Fetching a remote step's checklist failed.
    #[error("Could not fetch checklist for step {step}: {message}")]
    RunbookFetch { step: String, message: String },

    /// Reporting an item outcome to the runbook service failed.
    #[error("Could not update item {item} of step {step}: {message}")]
    RunbookUpdate {
        step: String,
        item: String,
        message: String,
    },

    /// Executables required by checks are not installed.
    #[error("There are missing executables from your path: {}", join_names(.0))]
    MissingTools(BTreeSet<String>),

    /// The skip count is larger than the number of items.
    #[error("Cannot skip {skip} items, there are only {total}")]
    InvalidSkip { skip: usize, total: usize },

    /// Shell command could not be run.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Shell command exceeded its time budget.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// The operator pressed Ctrl-C while a command or prompt was running.
    #[error("Interrupted by the operator")]
    Interrupted,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Result type alias for preflighter operations.
pub type Result<T> = std::result::Result<T, PreflightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_checklists_asks_for_input() {
        let err = PreflightError::NoChecklists;
        assert!(err.to_string().contains("one or more checklists"));
    }

    #[test]
    fn checklist_not_found_displays_path() {
        let err = PreflightError::ChecklistNotFound {
            path: PathBuf::from("/foo/upgrade.yml"),
        };
        assert!(err.to_string().contains("/foo/upgrade.yml"));
    }

    #[test]
    fn checklist_parse_error_displays_path_and_message() {
        let err = PreflightError::ChecklistParseError {
            path: PathBuf::from("/checklist.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/checklist.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn env_command_failure_includes_command_and_cause() {
        let err = EnvResolutionError::CommandFailed {
            command: "kubectl config current-context".into(),
            message: "exit status 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kubectl config current-context"));
        assert!(msg.contains("exit status 1"));
    }

    #[test]
    fn env_missing_variable_names_variable() {
        let err = EnvResolutionError::MissingVariable {
            name: "API_KEY".into(),
        };
        assert_eq!(err.to_string(), "Missing required API_KEY environment variable");
    }

    #[test]
    fn env_resolution_counts_failures() {
        let err = PreflightError::EnvResolution(vec![
            EnvResolutionError::MissingVariable { name: "A".into() },
            EnvResolutionError::MissingVariable { name: "B".into() },
        ]);
        assert!(err.to_string().starts_with("2 environment"));
    }

    #[test]
    fn runbook_fetch_displays_step() {
        let err = PreflightError::RunbookFetch {
            step: "deploy-step-7".into(),
            message: "HTTP 404".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("deploy-step-7"));
        assert!(msg.contains("HTTP 404"));
    }

    #[test]
    fn missing_tools_lists_every_tool() {
        let tools: BTreeSet<String> = ["kubectl", "helm"].iter().map(|s| s.to_string()).collect();
        let msg = PreflightError::MissingTools(tools).to_string();
        assert!(msg.contains("helm, kubectl"));
    }

    #[test]
    fn invalid_skip_displays_bounds() {
        let err = PreflightError::InvalidSkip { skip: 5, total: 3 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn command_timed_out_displays_seconds() {
        let err = PreflightError::CommandTimedOut {
            command: "sleep 100".into(),
            seconds: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("sleep 100"));
        assert!(msg.contains("2s"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PreflightError = io_err.into();
        assert!(matches!(err, PreflightError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(PreflightError::NoChecklists)
        }
        assert!(returns_error().is_err());
    }
}
