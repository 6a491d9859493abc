//! Check execution.
//!
//! A [`Runner`] is the prepared context automated checks run in: a working
//! directory for scripts, the merged checklist environment and a default
//! time budget. It also answers which required executables are missing.

pub mod tools;

pub use tools::{missing_tools, resolve_tool_path};

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;

use crate::checklist::ChecklistItem;
use crate::config::PreflightConfig;
use crate::error::Result;
use crate::shell::{execute_script, CommandOptions};

/// What an automated check produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the script exited zero.
    pub success: bool,
    /// Trimmed stdout.
    pub value: String,
    /// Raw stdout.
    pub stdout: String,
    /// Raw stderr.
    pub stderr: String,
}

/// Runs an item's automated check.
pub trait CheckRunner {
    /// Run the check of the item at `index` in the flattened sequence.
    ///
    /// A non-zero exit is a normal outcome with `success == false`. Errors are
    /// reserved for checks that couldn't run to completion (missing check,
    /// spawn failure, timeout).
    fn run_check(&self, index: usize, item: &ChecklistItem) -> Result<CheckOutcome>;
}

enum WorkDir {
    Kept(PathBuf),
    Temporary(TempDir),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Kept(path) => path,
            WorkDir::Temporary(dir) => dir.path(),
        }
    }
}

/// Prepared execution context for automated checks.
pub struct Runner {
    workdir: WorkDir,
    env: HashMap<String, String>,
    tools: BTreeSet<String>,
    check_timeout: Duration,
}

impl Runner {
    /// Prepare a runner.
    ///
    /// With `temp_dir` set the directory is created if needed and left in
    /// place afterwards; otherwise scripts go to a directory removed on drop.
    pub fn new(config: &PreflightConfig) -> Result<Self> {
        let workdir = match &config.temp_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                WorkDir::Kept(dir.clone())
            }
            None => WorkDir::Temporary(
                tempfile::Builder::new().prefix("preflighter-").tempdir()?,
            ),
        };
        tracing::debug!("Check scripts go to {}", workdir.path().display());

        Ok(Self {
            workdir,
            env: config.env(),
            tools: config.tools().clone(),
            check_timeout: config.check_timeout,
        })
    }

    /// Directory check scripts are written to and run in.
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    /// Required executables that can't be found.
    ///
    /// A `PATH` set by a checklist takes precedence over the process `PATH`.
    pub fn missing_tools(&self) -> BTreeSet<String> {
        let path = match self.env.get("PATH") {
            Some(path) => tools::split_path(Some(path.as_ref())),
            None => tools::split_path(std::env::var_os("PATH").as_deref()),
        };
        missing_tools(&self.tools, &path)
    }
}

impl CheckRunner for Runner {
    fn run_check(&self, index: usize, item: &ChecklistItem) -> Result<CheckOutcome> {
        let check = item.check.as_ref().ok_or_else(|| {
            anyhow::anyhow!("'{}' has no automated check", item.title)
        })?;

        let script = self.workdir().join(format!("item-{}.sh", index));
        fs::write(&script, &check.script)?;

        let options = CommandOptions {
            cwd: Some(self.workdir().to_path_buf()),
            env: self.env.clone(),
            shell: check.shell.clone(),
            timeout: Some(
                check
                    .timeout
                    .map(Duration::from_secs)
                    .unwrap_or(self.check_timeout),
            ),
        };

        let result = execute_script(&script, &options)?;
        tracing::debug!(
            "Check for '{}' exited {:?} in {:?}",
            item.title,
            result.exit_code,
            result.duration
        );

        Ok(CheckOutcome {
            success: result.success,
            value: result.stdout.trim().to_string(),
            stdout: result.stdout,
            stderr: result.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{CheckSpec, ChecklistFile};
    use crate::error::PreflightError;

    fn config_with(env: &[(&str, &str)], temp_dir: Option<PathBuf>) -> PreflightConfig {
        let file = ChecklistFile {
            title: "t".into(),
            filename: "t.yml".into(),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            ..Default::default()
        };
        let mut config = PreflightConfig {
            temp_dir,
            ..Default::default()
        };
        config.add_checklist_file(&file).unwrap();
        config
    }

    #[test]
    #[cfg(unix)]
    fn passing_check_captures_value() {
        let runner = Runner::new(&config_with(&[], None)).unwrap();
        let item = ChecklistItem::scripted("echo", "echo '  ready  '");

        let outcome = runner.run_check(0, &item).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.value, "ready");
        assert!(outcome.stdout.ends_with('\n'));
    }

    #[test]
    #[cfg(unix)]
    fn failing_check_is_not_an_error() {
        let runner = Runner::new(&config_with(&[], None)).unwrap();
        let item = ChecklistItem::scripted("fail", "echo nope >&2; exit 2");

        let outcome = runner.run_check(1, &item).unwrap();

        assert!(!outcome.success);
        assert!(outcome.stderr.contains("nope"));
    }

    #[test]
    #[cfg(unix)]
    fn checks_see_resolved_env_and_run_in_workdir() {
        let runner = Runner::new(&config_with(&[("REGION", "eu-west-1")], None)).unwrap();
        let item = ChecklistItem::scripted("env", "echo \"$REGION\"; ls");

        let outcome = runner.run_check(3, &item).unwrap();

        assert!(outcome.stdout.contains("eu-west-1"));
        assert!(outcome.stdout.contains("item-3.sh"));
    }

    #[test]
    #[cfg(unix)]
    fn kept_temp_dir_survives_runner() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("scripts");
        {
            let runner = Runner::new(&config_with(&[], Some(dir.clone()))).unwrap();
            runner
                .run_check(0, &ChecklistItem::scripted("x", "true"))
                .unwrap();
        }
        assert!(dir.join("item-0.sh").exists());
    }

    #[test]
    #[cfg(unix)]
    fn check_timeout_is_an_error() {
        let runner = Runner::new(&config_with(&[], None)).unwrap();
        let mut item = ChecklistItem::scripted("slow", "sleep 5");
        if let Some(check) = item.check.as_mut() {
            check.timeout = Some(0);
        }

        let err = runner.run_check(0, &item).unwrap_err();
        assert!(matches!(err, PreflightError::CommandTimedOut { .. }));
    }

    #[test]
    fn manual_item_cannot_be_run() {
        let runner = Runner::new(&config_with(&[], None)).unwrap();
        assert!(runner.run_check(0, &ChecklistItem::manual("x")).is_err());
    }

    #[test]
    #[cfg(unix)]
    fn missing_tools_includes_unknown_shells() {
        let mut item = ChecklistItem::manual("x");
        item.check = Some(CheckSpec {
            script: "true".into(),
            shell: Some("definitely-not-a-shell-xyz".into()),
            ..Default::default()
        });
        let file = ChecklistFile {
            title: "t".into(),
            filename: "t.yml".into(),
            tools: vec!["sh".into()],
            checklist: vec![item],
            ..Default::default()
        };
        let mut config = PreflightConfig::default();
        config.add_checklist_file(&file).unwrap();

        let missing = Runner::new(&config).unwrap().missing_tools();

        assert!(missing.contains("definitely-not-a-shell-xyz"));
        assert!(!missing.contains("sh"));
    }
}
