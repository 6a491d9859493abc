//! Run command implementation.
//!
//! Walks the flattened checklist through the item executor and prints the
//! final verdict. The exit code is 0 only when the run is clear.

use crate::checklist::flatten_items;
use crate::cli::args::Cli;
use crate::config::PreflightConfig;
use crate::error::{PreflightError, Result};
use crate::executor::ItemExecutor;
use crate::runbook::{OutcomeReporter, RunbookSynchronizer};
use crate::runner::Runner;
use crate::shell::interrupt_flag;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::prepare::prepare;

/// The run command implementation.
pub struct RunCommand {
    cli: Cli,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    fn config(&self) -> PreflightConfig {
        PreflightConfig {
            temp_dir: self.cli.temp.clone(),
            check_timeout: self.cli.check_timeout(),
            env_timeout: self.cli.env_timeout(),
            ..Default::default()
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let prepared = prepare(&self.cli.sources, self.cli.env_timeout(), ui)?;

        let mut config = self.config();
        for file in &prepared.files {
            config.add_checklist_file(file)?;
        }
        tracing::debug!(
            "{} items across {} checklists",
            config.item_count(),
            prepared.files.len()
        );

        let runner = Runner::new(&config)?;
        let missing = runner.missing_tools();
        if !missing.is_empty() {
            for tool in &missing {
                ui.error(&format!(" ‣ Did not find '{}'", tool));
            }
            return Err(PreflightError::MissingTools(missing));
        }

        let items = flatten_items(&prepared.files);
        let title = prepared
            .files
            .first()
            .map(|file| file.title.as_str())
            .unwrap_or_default();
        ui.show_header(&format!("{} Pre-Flight Checklist", title));

        let reporter = OutcomeReporter::new(
            prepared
                .runbook
                .as_ref()
                .map(|client| client as &dyn RunbookSynchronizer),
        );
        let executor = ItemExecutor::new(self.cli.run_mode(), &reporter, interrupt_flag());
        let report = executor.run(&items, self.cli.skip, ui, &runner)?;

        ui.show_final(report.success);

        if report.success {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ItemOutcome, ABORTED};
    use crate::ui::MockUI;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("preflighter").chain(args.iter().copied()))
    }

    fn write(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("checklist.yml");
        fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[test]
    #[cfg(unix)]
    fn automated_run_passes() {
        let temp = TempDir::new().unwrap();
        let source = write(
            &temp,
            "title: Deploy\nchecklist:\n  - title: ready\n    check:\n      script: echo ok\n",
        );
        let mut ui = MockUI::new();

        let result = RunCommand::new(cli(&["-a", &source])).execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(ui.headers(), &["Deploy Pre-Flight Checklist"]);
        assert_eq!(
            ui.outcomes(),
            vec![ItemOutcome::Passed {
                value: "ok".into()
            }]
        );
        assert_eq!(ui.finals(), &[true]);
    }

    #[test]
    #[cfg(unix)]
    fn failure_aborts_the_rest() {
        let temp = TempDir::new().unwrap();
        let source = write(
            &temp,
            "title: Deploy\nchecklist:\n  - title: one\n  - title: two\n    check:\n      script: exit 1\n  - title: three\n",
        );
        let mut ui = MockUI::new();

        let result = RunCommand::new(cli(&["-a", "-s", "1", &source]))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        let outcomes = ui.outcomes();
        assert_eq!(outcomes[0], ItemOutcome::Blank);
        assert!(matches!(outcomes[1], ItemOutcome::Failed { .. }));
        assert_eq!(outcomes[2], ItemOutcome::Skipped(ABORTED.into()));
        assert_eq!(ui.finals(), &[false]);
    }

    #[test]
    fn missing_tools_stop_before_any_item() {
        let temp = TempDir::new().unwrap();
        let source = write(
            &temp,
            "title: Deploy\ntools:\n  - preflighter-no-such-tool\nchecklist:\n  - title: one\n",
        );
        let mut ui = MockUI::new();

        let err = RunCommand::new(cli(&["-a", &source]))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, PreflightError::MissingTools(_)));
        assert_eq!(ui.errors(), &[" ‣ Did not find 'preflighter-no-such-tool'"]);
        assert!(ui.items().is_empty());
    }

    #[test]
    fn skip_past_the_end_is_rejected() {
        let temp = TempDir::new().unwrap();
        let source = write(&temp, "title: Deploy\nchecklist:\n  - title: one\n");
        let mut ui = MockUI::new();

        let err = RunCommand::new(cli(&["-a", "-s", "2", &source]))
            .execute(&mut ui)
            .unwrap_err();

        assert!(matches!(err, PreflightError::InvalidSkip { skip: 2, total: 1 }));
    }

    #[test]
    fn temp_dir_is_created() {
        let temp = TempDir::new().unwrap();
        let source = write(&temp, "title: Deploy\nchecklist:\n  - title: one\n");
        let scripts = temp.path().join("scripts");
        let scripts_arg = scripts.display().to_string();
        let mut ui = MockUI::new();

        RunCommand::new(cli(&["-a", "-s", "1", "--temp", &scripts_arg, &source]))
            .execute(&mut ui)
            .unwrap();

        assert!(scripts.is_dir());
    }
}
