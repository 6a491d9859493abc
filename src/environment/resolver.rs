//! Environment requirement resolution.
//!
//! Resolves each [`EnvMarker`] in place:
//!
//! 1. `Literal` values stay as they are
//! 2. `Command` values become the trimmed stdout of the command
//! 3. `Required` values become the variable's current process value
//!
//! Command execution goes through the [`CommandRunner`] trait so tests (and
//! callers with special needs) can swap out the shell.

use std::collections::HashMap;
use std::time::Duration;

use crate::checklist::{ChecklistFile, EnvMarker};
use crate::error::{EnvResolutionError, PreflightError, Result};
use crate::shell::{execute, CommandOptions};

/// Runs the command text of a `${...}` marker.
pub trait CommandRunner {
    /// Run `command` and return its stdout, or a description of why it failed.
    fn run(&self, command: &str) -> std::result::Result<String, String>;
}

/// Runs marker commands through a real shell.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner {
    /// Shell program (None = platform default).
    pub shell: Option<String>,
    /// Time budget per command.
    pub timeout: Option<Duration>,
}

impl ShellCommandRunner {
    /// Create a runner with a time budget per command.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            shell: None,
            timeout: Some(timeout),
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> std::result::Result<String, String> {
        let options = CommandOptions {
            shell: self.shell.clone(),
            timeout: self.timeout,
            ..Default::default()
        };

        match execute(command, &options) {
            Ok(result) if result.success => Ok(result.stdout),
            Ok(result) => {
                let code = result
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                let stderr = result.stderr.trim();
                if stderr.is_empty() {
                    Err(format!("exit status {}", code))
                } else {
                    Err(format!("exit status {}: {}", code, stderr))
                }
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Process environment lookup used by [`EnvironmentResolver::new`].
pub type EnvLookup = fn(&str) -> std::result::Result<String, std::env::VarError>;

/// Resolves checklist `env` maps.
pub struct EnvironmentResolver<R, F> {
    runner: R,
    lookup: F,
}

impl<R: CommandRunner> EnvironmentResolver<R, EnvLookup> {
    /// Resolve against the real process environment.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            lookup: |key: &str| std::env::var(key),
        }
    }
}

impl<R, F> EnvironmentResolver<R, F>
where
    R: CommandRunner,
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    /// Resolve with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn with_env(runner: R, lookup: F) -> Self {
        Self { runner, lookup }
    }

    /// Resolve every entry of every file, returning all failures.
    pub fn resolve_all(&self, files: &mut [ChecklistFile]) -> Vec<EnvResolutionError> {
        let mut failures = Vec::new();
        for file in files.iter_mut() {
            self.resolve_file(file, &mut failures);
        }
        failures
    }

    /// Resolve one file's entries, appending failures to `failures`.
    ///
    /// Keys are visited in sorted order so failures are reported deterministically.
    pub fn resolve_file(&self, file: &mut ChecklistFile, failures: &mut Vec<EnvResolutionError>) {
        let mut keys: Vec<String> = file.env.keys().cloned().collect();
        keys.sort();

        let mut resolved = HashMap::with_capacity(keys.len());
        for key in keys {
            let raw = &file.env[&key];
            match self.resolve_one(&key, raw) {
                Ok(value) => {
                    resolved.insert(key, value);
                }
                Err(failure) => {
                    tracing::debug!("{}: {}", file.filename, failure);
                    failures.push(failure);
                    resolved.insert(key, raw.clone());
                }
            }
        }
        file.env = resolved;
    }

    fn resolve_one(
        &self,
        key: &str,
        raw: &str,
    ) -> std::result::Result<String, EnvResolutionError> {
        match EnvMarker::parse(raw) {
            EnvMarker::Literal(value) => Ok(value),
            EnvMarker::Command(command) if command.trim().is_empty() => Ok(String::new()),
            EnvMarker::Command(command) => {
                tracing::debug!("Resolving {} from `{}`", key, command);
                self.runner
                    .run(&command)
                    .map(|out| out.trim_end_matches(['\n', '\r', '\t', ' ']).to_string())
                    .map_err(|message| EnvResolutionError::CommandFailed { command, message })
            }
            EnvMarker::Required => match (self.lookup)(key) {
                Ok(value) if !value.is_empty() => Ok(value),
                _ => Err(EnvResolutionError::MissingVariable {
                    name: key.to_string(),
                }),
            },
        }
    }
}

/// Resolve all files against the process environment through a shell.
///
/// # Errors
///
/// Returns `EnvResolution` carrying every failure if any entry failed.
pub fn resolve_environment(files: &mut [ChecklistFile], timeout: Duration) -> Result<()> {
    let resolver = EnvironmentResolver::new(ShellCommandRunner::with_timeout(timeout));
    let failures = resolver.resolve_all(files);
    if failures.is_empty() {
        Ok(())
    } else {
        Err(PreflightError::EnvResolution(failures))
    }
}
