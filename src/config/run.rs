//! Prepared run configuration.
//!
//! Each loaded checklist contributes one environment layer. Later
//! checklists override earlier ones for the same variable, and the source of
//! every value is kept for debugging.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::time::Duration;

use crate::checklist::{required_tools, ChecklistFile};
use crate::error::{PreflightError, Result};

/// Time budget for one automated check unless the check sets its own.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(300);

/// Time budget for one `${...}` environment command.
pub const DEFAULT_ENV_TIMEOUT: Duration = Duration::from_secs(30);

/// Variables contributed by one checklist.
#[derive(Debug, Clone, Default)]
pub struct EnvLayer {
    /// Variables in this layer.
    pub vars: HashMap<String, String>,
    /// Checklist the layer came from.
    pub source: String,
}

/// Configuration a runner is prepared from.
#[derive(Debug, Clone)]
pub struct PreflightConfig {
    /// Keep check scripts in this directory instead of a throwaway one.
    pub temp_dir: Option<PathBuf>,

    /// Default time budget per automated check.
    pub check_timeout: Duration,

    /// Time budget per `${...}` environment command.
    pub env_timeout: Duration,

    pub(crate) layers: Vec<EnvLayer>,
    pub(crate) tools: BTreeSet<String>,
    pub(crate) item_count: usize,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            env_timeout: DEFAULT_ENV_TIMEOUT,
            layers: Vec::new(),
            tools: BTreeSet::new(),
            item_count: 0,
        }
    }
}

impl PreflightConfig {
    /// Add a resolved checklist's environment and tool requirements.
    ///
    /// # Errors
    ///
    /// Returns `ChecklistParseError` if a variable name can't be exported
    /// to a child process.
    pub fn add_checklist_file(&mut self, file: &ChecklistFile) -> Result<()> {
        for key in file.env.keys() {
            if key.is_empty() || key.contains('=') || key.contains('\0') {
                return Err(PreflightError::ChecklistParseError {
                    path: PathBuf::from(&file.filename),
                    message: format!("'{}' is not a valid environment variable name", key),
                });
            }
            if let Some(previous) = self.env_source(key) {
                tracing::debug!("{} overrides {} from {}", file.filename, key, previous);
            }
        }

        self.layers.push(EnvLayer {
            vars: file.env.clone(),
            source: file.filename.clone(),
        });
        self.tools
            .extend(required_tools(std::slice::from_ref(file)));
        self.item_count += file.checklist.len();
        Ok(())
    }

    /// The merged environment; later checklists win.
    pub fn env(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        for layer in &self.layers {
            result.extend(layer.vars.clone());
        }
        result
    }

    /// The checklist that supplied a variable's effective value.
    pub fn env_source(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.vars.contains_key(key))
            .map(|layer| layer.source.as_str())
    }

    /// Every executable the added checklists need.
    pub fn tools(&self) -> &BTreeSet<String> {
        &self.tools
    }

    /// Number of items across the added checklists.
    pub fn item_count(&self) -> usize {
        self.item_count
    }
}
