//! Checklist data model and loading.
//!
//! - [`ChecklistFile`] - one loaded (or synthesized) checklist source
//! - [`ChecklistItem`] - one checkable unit, optionally automated
//! - [`EnvMarker`] - how an `env` entry is resolved
//! - [`load_sources`] - turn command-line sources into checklists
//!
//! # Example
//!
//! ```
//! use preflighter::checklist::{parse_checklist, flatten_items};
//! use std::path::Path;
//!
//! let yaml = r#"
//! title: Upgrade
//! checklist:
//!   - title: Backups are recent
//!     check:
//!       script: "true"
//!   - title: Announce the window
//! "#;
//!
//! let file = parse_checklist(yaml, Path::new("upgrade.yml")).unwrap();
//! let items = flatten_items(&[file]);
//! assert_eq!(items.len(), 2);
//! assert!(items[0].can_check());
//! assert!(!items[1].can_check());
//! ```

pub mod loader;
pub mod marker;

pub use loader::{load_checklist, load_sources, parse_checklist, runbook_checklist, RUNBOOK_PREFIX};
pub use marker::EnvMarker;

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};

/// One loaded or synthesized checklist source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChecklistFile {
    /// Label shown to the operator.
    pub title: String,

    /// Origin identifier (path, or `runbook:<id>` for remote-only checklists).
    #[serde(skip)]
    pub filename: String,

    /// Variable name to requirement marker; replaced with resolved values.
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Executables every check in this file needs.
    #[serde(default)]
    pub tools: Vec<String>,

    /// Ordered items.
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,

    /// Remote steps whose items are appended after `checklist`.
    #[serde(default)]
    pub runbook_steps: Vec<String>,
}

impl ChecklistFile {
    /// Whether this file needs the runbook service.
    pub fn uses_runbook(&self) -> bool {
        !self.runbook_steps.is_empty() || self.checklist.iter().any(|i| i.runbook_link().is_some())
    }
}

/// One checkable unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChecklistItem {
    /// Operator-facing description.
    pub title: String,

    /// Automated check; manual-only when absent.
    #[serde(default)]
    pub check: Option<CheckSpec>,

    /// Remote item identifier.
    #[serde(default)]
    pub runbook_id: Option<String>,

    /// Remote step the item belongs to.
    #[serde(default)]
    pub runbook_step: Option<String>,
}

impl ChecklistItem {
    /// Create a manual-only item.
    pub fn manual(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Create an item backed by a check script.
    pub fn scripted(title: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            check: Some(CheckSpec::script(script)),
            ..Default::default()
        }
    }

    /// Whether the item carries an automated check.
    pub fn can_check(&self) -> bool {
        self.check.is_some()
    }

    /// The `(step, id)` linkage to the remote tracking entry, if any.
    pub fn runbook_link(&self) -> Option<(&str, &str)> {
        match (&self.runbook_step, &self.runbook_id) {
            (Some(step), Some(id)) => Some((step.as_str(), id.as_str())),
            _ => None,
        }
    }
}

/// An automated check.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CheckSpec {
    /// Script body; success is a zero exit status.
    pub script: String,

    /// Executables the script needs.
    #[serde(default)]
    pub tools: Vec<String>,

    /// Interpreter (default `sh`).
    #[serde(default)]
    pub shell: Option<String>,

    /// Time budget in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl CheckSpec {
    /// A check running `script` with defaults.
    pub fn script(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }
}

/// Concatenate every file's items in the order the files were supplied.
pub fn flatten_items(files: &[ChecklistFile]) -> Vec<ChecklistItem> {
    files
        .iter()
        .flat_map(|f| f.checklist.iter().cloned())
        .collect()
}

/// Whether any checklist needs the runbook service.
pub fn needs_runbook(files: &[ChecklistFile]) -> bool {
    files.iter().any(ChecklistFile::uses_runbook)
}

/// Every executable named by the files and their checks, including check shells.
pub fn required_tools(files: &[ChecklistFile]) -> BTreeSet<String> {
    let mut tools = BTreeSet::new();
    for file in files {
        tools.extend(file.tools.iter().cloned());
        for check in file.checklist.iter().filter_map(|i| i.check.as_ref()) {
            tools.extend(check.tools.iter().cloned());
            if let Some(shell) = &check.shell {
                tools.insert(shell.clone());
            }
        }
    }
    tools.retain(|t| !t.trim().is_empty());
    tools
}
