//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for unattended runs and non-TTY sessions
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use preflighter::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet, false);
//! ui.show_header("Upgrade Pre-Flight Checklist");
//! ui.show_final(true);
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, PreflightTheme};

use std::sync::atomic::{AtomicBool, Ordering};

use crate::checklist::ChecklistItem;
use crate::error::{PreflightError, Result};
use crate::executor::ItemOutcome;
use crate::runner::CheckRunner;

/// Banner shown when every attempted item passed.
pub const CLEAR_BANNER: &str = "🍺 All checks are passing. You are clear to continue";

/// Banner shown when an item failed or the run was aborted.
pub const NOT_CLEAR_BANNER: &str = "🚨 There was a failed item. You are not clear to continue";

/// Prompt key for confirming a manual item.
pub const CONFIRM_ITEM_KEY: &str = "confirm_item";

/// Prompt key for deciding what to do with a failed check.
pub const CHECK_FAILED_KEY: &str = "check_failed";

/// The operator's decision on one item in interactive mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemVerdict {
    /// Whether the item counts as passed.
    pub passed: bool,
    /// Check stdout, empty for manual items.
    pub stdout: String,
    /// Check stderr, or the reason the check couldn't run.
    pub stderr: String,
    /// Trimmed stdout.
    pub value: String,
}

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user, whatever the output mode.
    fn message(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show the checklist banner.
    fn show_header(&mut self, title: &str);

    /// Render an item's outcome. `index` is 0-based.
    fn show_item(&mut self, index: usize, item: &ChecklistItem, outcome: &ItemOutcome);

    /// Show captured check output.
    fn show_output_block(&mut self, stdout: &str, stderr: &str);

    /// Show the final verdict banner.
    fn show_final(&mut self, success: bool);

    /// Decide an item with the operator.
    ///
    /// Manual items are confirmed yes/no. Automated checks run under a
    /// spinner; a failing check shows its output and offers a retry, an
    /// override or accepting the failure.
    ///
    /// Returns `Interrupted` once `cancel` is raised, without offering
    /// another attempt.
    fn check_item(
        &mut self,
        index: usize,
        item: &ChecklistItem,
        runner: &dyn CheckRunner,
        cancel: &AtomicBool,
    ) -> Result<ItemVerdict> {
        if !item.can_check() {
            let answer = self.prompt(&Prompt::confirm(
                CONFIRM_ITEM_KEY,
                format!("{}. {}: is this done?", index + 1, item.title),
            ))?;
            return Ok(ItemVerdict {
                passed: answer.as_bool().unwrap_or(false),
                ..Default::default()
            });
        }

        loop {
            let mut spinner = self.start_spinner(&format!("Checking {}", item.title));
            let checked = runner.run_check(index, item);
            spinner.finish_clear();
            if cancel.load(Ordering::SeqCst) {
                return Err(PreflightError::Interrupted);
            }

            let verdict = match checked {
                Err(PreflightError::Interrupted) => return Err(PreflightError::Interrupted),
                Ok(outcome) => ItemVerdict {
                    passed: outcome.success,
                    stdout: outcome.stdout,
                    stderr: outcome.stderr,
                    value: outcome.value,
                },
                Err(e) => ItemVerdict {
                    stderr: e.to_string(),
                    ..Default::default()
                },
            };

            if verdict.passed {
                return Ok(verdict);
            }

            self.show_output_block(&verdict.stdout, &verdict.stderr);
            let choice = self.prompt(&Prompt::failed_check(&item.title))?;
            match choice.as_string().as_str() {
                "retry" => continue,
                "override" => {
                    return Ok(ItemVerdict {
                        passed: true,
                        ..verdict
                    })
                }
                _ => return Ok(verdict),
            }
        }
    }
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Remove the spinner without leaving a line behind.
    fn finish_clear(&mut self);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for lookup in tests).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    /// A yes/no question defaulting to no.
    pub fn confirm(key: &str, question: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type: PromptType::Confirm,
            default: Some("false".to_string()),
        }
    }

    /// The retry / override / fail choice for a failed check.
    pub fn failed_check(title: &str) -> Self {
        let option = |label: &str, value: &str| PromptOption {
            label: label.to_string(),
            value: value.to_string(),
        };
        Self {
            key: CHECK_FAILED_KEY.to_string(),
            question: format!("The check for '{}' failed. What now?", title),
            prompt_type: PromptType::Select {
                options: vec![
                    option("Retry the check", "retry"),
                    option("Override as passed", "override"),
                    option("Mark as failed", "fail"),
                ],
            },
            default: Some("retry".to_string()),
        }
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

/// Result of a prompt.
#[derive(Debug, Clone)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from select.
    String(String),
}

impl PromptResult {
    /// Get as string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    /// Get as bool. Strings are read as yes/no answers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) => Some(prompts::parse_bool(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CheckOutcome;
    use std::cell::Cell;

    static NOT_CANCELLED: AtomicBool = AtomicBool::new(false);

    /// Fails the first `failures` runs, then passes.
    struct CountingRunner {
        failures: Cell<u32>,
        runs: Cell<u32>,
    }

    impl CountingRunner {
        fn failing(failures: u32) -> Self {
            Self {
                failures: Cell::new(failures),
                runs: Cell::new(0),
            }
        }
    }

    impl CheckRunner for CountingRunner {
        fn run_check(&self, _: usize, _: &ChecklistItem) -> Result<CheckOutcome> {
            self.runs.set(self.runs.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Ok(CheckOutcome {
                    success: false,
                    stdout: "partial".into(),
                    stderr: "boom".into(),
                    ..Default::default()
                });
            }
            Ok(CheckOutcome {
                success: true,
                value: "ok".into(),
                stdout: "ok\n".into(),
                ..Default::default()
            })
        }
    }

    struct BrokenRunner;

    impl CheckRunner for BrokenRunner {
        fn run_check(&self, _: usize, _: &ChecklistItem) -> Result<CheckOutcome> {
            Err(PreflightError::CommandTimedOut {
                command: "item-0.sh".into(),
                seconds: 1,
            })
        }
    }

    #[test]
    fn prompt_result_conversions() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::String("yes".into()).as_bool(), Some(true));
        assert_eq!(PromptResult::String("retry".into()).as_bool(), Some(false));
    }

    #[test]
    fn failed_check_prompt_offers_three_choices() {
        let prompt = Prompt::failed_check("Nodes");
        match prompt.prompt_type {
            PromptType::Select { options } => {
                let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
                assert_eq!(values, vec!["retry", "override", "fail"]);
            }
            other => panic!("unexpected prompt type: {:?}", other),
        }
    }

    #[test]
    fn manual_item_uses_confirmation() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CONFIRM_ITEM_KEY, "yes");
        let runner = CountingRunner::failing(0);

        let verdict = ui
            .check_item(0, &ChecklistItem::manual("Announce"), &runner, &NOT_CANCELLED)
            .unwrap();

        assert!(verdict.passed);
        assert_eq!(runner.runs.get(), 0);
        assert_eq!(ui.prompts_shown(), &[CONFIRM_ITEM_KEY.to_string()]);
    }

    #[test]
    fn manual_item_declined_fails() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CONFIRM_ITEM_KEY, "no");

        let verdict = ui
            .check_item(
                0,
                &ChecklistItem::manual("Announce"),
                &CountingRunner::failing(0),
                &NOT_CANCELLED,
            )
            .unwrap();

        assert!(!verdict.passed);
    }

    #[test]
    fn passing_check_needs_no_prompt() {
        let mut ui = MockUI::new();
        let runner = CountingRunner::failing(0);

        let verdict = ui
            .check_item(0, &ChecklistItem::scripted("x", "true"), &runner, &NOT_CANCELLED)
            .unwrap();

        assert!(verdict.passed);
        assert_eq!(verdict.value, "ok");
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn retry_then_pass() {
        let mut ui = MockUI::new();
        ui.queue_prompt_responses(CHECK_FAILED_KEY, vec!["retry"]);
        let runner = CountingRunner::failing(1);

        let verdict = ui
            .check_item(0, &ChecklistItem::scripted("x", "flaky"), &runner, &NOT_CANCELLED)
            .unwrap();

        assert!(verdict.passed);
        assert_eq!(runner.runs.get(), 2);
        assert_eq!(ui.output_blocks().len(), 1);
    }

    #[test]
    fn override_keeps_output() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CHECK_FAILED_KEY, "override");

        let verdict = ui
            .check_item(
                0,
                &ChecklistItem::scripted("x", "false"),
                &CountingRunner::failing(5),
                &NOT_CANCELLED,
            )
            .unwrap();

        assert!(verdict.passed);
        assert_eq!(verdict.stderr, "boom");
    }

    #[test]
    fn mark_failed_returns_failure() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CHECK_FAILED_KEY, "fail");

        let verdict = ui
            .check_item(
                0,
                &ChecklistItem::scripted("x", "false"),
                &CountingRunner::failing(5),
                &NOT_CANCELLED,
            )
            .unwrap();

        assert!(!verdict.passed);
        assert_eq!(verdict.stdout, "partial");
    }

    #[test]
    fn run_error_is_a_failed_verdict() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CHECK_FAILED_KEY, "fail");

        let verdict = ui
            .check_item(0, &ChecklistItem::scripted("x", "sleep 9"), &BrokenRunner, &NOT_CANCELLED)
            .unwrap();

        assert!(!verdict.passed);
        assert!(verdict.stderr.contains("timed out"));
    }

    /// Raises the cancel flag while its check runs, like Ctrl-C would.
    struct CancellingRunner<'a> {
        cancel: &'a AtomicBool,
        runs: Cell<u32>,
    }

    impl CheckRunner for CancellingRunner<'_> {
        fn run_check(&self, _: usize, _: &ChecklistItem) -> Result<CheckOutcome> {
            self.runs.set(self.runs.get() + 1);
            self.cancel.store(true, Ordering::SeqCst);
            Ok(CheckOutcome::default())
        }
    }

    #[test]
    fn cancel_during_check_offers_no_retry() {
        let mut ui = MockUI::new();
        ui.set_prompt_response(CHECK_FAILED_KEY, "retry");
        let cancel = AtomicBool::new(false);
        let runner = CancellingRunner {
            cancel: &cancel,
            runs: Cell::new(0),
        };

        let err = ui
            .check_item(0, &ChecklistItem::scripted("x", "sleep 9"), &runner, &cancel)
            .unwrap_err();

        assert!(matches!(err, PreflightError::Interrupted));
        assert_eq!(runner.runs.get(), 1);
        assert!(ui.prompts_shown().is_empty());
    }
}
