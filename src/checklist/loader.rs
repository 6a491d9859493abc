//! Checklist source loading.
//!
//! Command-line sources are either paths to YAML checklist files or
//! `runbook:<step>` references that synthesize a checklist from one remote
//! step. Any load failure aborts before anything else happens.

use crate::checklist::ChecklistFile;
use crate::error::{PreflightError, Result};
use std::fs;
use std::path::Path;

/// Source prefix for checklists built purely from a remote step.
pub const RUNBOOK_PREFIX: &str = "runbook:";

/// Load every source in order.
///
/// # Errors
///
/// Returns `NoChecklists` for an empty source list, otherwise the first
/// load error encountered.
pub fn load_sources<S: AsRef<str>>(sources: &[S]) -> Result<Vec<ChecklistFile>> {
    if sources.is_empty() {
        return Err(PreflightError::NoChecklists);
    }

    sources
        .iter()
        .map(|source| {
            let source = source.as_ref();
            match source.strip_prefix(RUNBOOK_PREFIX) {
                Some(step) => Ok(runbook_checklist(step)),
                None => load_checklist(Path::new(source)),
            }
        })
        .collect()
}

/// Build a checklist that consists of a single remote step.
pub fn runbook_checklist(step: &str) -> ChecklistFile {
    ChecklistFile {
        title: "Runbook Checklist".to_string(),
        filename: format!("{}{}", RUNBOOK_PREFIX, step),
        runbook_steps: vec![step.to_string()],
        ..Default::default()
    }
}

/// Load a single checklist file.
///
/// # Errors
///
/// Returns `ChecklistNotFound` if the file doesn't exist.
/// Returns `ChecklistParseError` if the YAML is invalid.
pub fn load_checklist(path: &Path) -> Result<ChecklistFile> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PreflightError::ChecklistNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PreflightError::Io(e)
        }
    })?;

    parse_checklist(&content, path)
}

/// Parse YAML content into a checklist.
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path recorded as the filename and used for error reporting
pub fn parse_checklist(content: &str, source_path: &Path) -> Result<ChecklistFile> {
    let parse_error = |message: String| PreflightError::ChecklistParseError {
        path: source_path.to_path_buf(),
        message,
    };

    let mut file: ChecklistFile =
        serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    for (index, item) in file.checklist.iter().enumerate() {
        if item.runbook_id.is_some() != item.runbook_step.is_some() {
            return Err(parse_error(format!(
                "item {} ('{}') must set both runbook_id and runbook_step or neither",
                index + 1,
                item.title
            )));
        }
        if let Some(check) = &item.check {
            if check.script.trim().is_empty() {
                return Err(parse_error(format!(
                    "item {} ('{}') has an empty check script",
                    index + 1,
                    item.title
                )));
            }
        }
    }

    file.filename = source_path.display().to_string();
    tracing::debug!(
        "Loaded checklist '{}' from {} ({} items, {} runbook steps)",
        file.title,
        file.filename,
        file.checklist.len(),
        file.runbook_steps.len()
    );
    Ok(file)
}
