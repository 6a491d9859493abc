//! Shared preparation pipeline.
//!
//! 1. Load every source
//! 2. Resolve every checklist's environment, reporting all failures at once
//! 3. Connect to the runbook service if any checklist needs it
//! 4. Append remote step items

use std::time::Duration;

use crate::checklist::{load_sources, needs_runbook, ChecklistFile};
use crate::environment::resolve_environment;
use crate::error::{PreflightError, Result};
use crate::runbook::{expand_runbook_steps, RunbookClient};
use crate::ui::UserInterface;

/// Checklists ready to list or run.
pub struct Prepared {
    /// Resolved and expanded checklists, in source order.
    pub files: Vec<ChecklistFile>,
    /// Runbook client, present only when some checklist uses the service.
    pub runbook: Option<RunbookClient>,
}

/// Load, resolve and expand `sources`.
///
/// # Errors
///
/// Any load, environment, runbook configuration or fetch error. Every
/// environment failure is shown on `ui` before the error is returned.
pub fn prepare(
    sources: &[String],
    env_timeout: Duration,
    ui: &mut dyn UserInterface,
) -> Result<Prepared> {
    let mut files = load_sources(sources)?;

    if let Err(e) = resolve_environment(&mut files, env_timeout) {
        if let PreflightError::EnvResolution(failures) = &e {
            for failure in failures {
                ui.error(&failure.to_string());
            }
        }
        return Err(e);
    }

    let runbook = if needs_runbook(&files) {
        let client = RunbookClient::from_env()?;
        expand_runbook_steps(&mut files, &client)?;
        Some(client)
    } else {
        None
    };

    Ok(Prepared { files, runbook })
}
