//! The item state machine.
//!
//! Items before the skip index are `Blank` and never touched. The rest run
//! strictly in order. After the first failure (or an interrupt) every later
//! item becomes `Skipped("ABORTED")` without running.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::checklist::ChecklistItem;
use crate::error::{PreflightError, Result};
use crate::runbook::{failure_note, ItemStatus, OutcomeReporter};
use crate::runner::CheckRunner;
use crate::ui::UserInterface;

/// Reason for items after a failure or interrupt.
pub const ABORTED: &str = "ABORTED";

/// Reason for manual items in unattended mode.
pub const NO_CHECKS: &str = "NO CHECKS";

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Before the skip index; never attempted.
    Blank,
    /// Not attempted, with the reason.
    Skipped(String),
    /// The item passed; `value` is the check's trimmed stdout.
    Passed { value: String },
    /// The item failed.
    Failed {
        message: String,
        stdout: String,
        stderr: String,
    },
}

impl ItemOutcome {
    /// Whether this outcome fails the run.
    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
            || matches!(self, ItemOutcome::Skipped(reason) if reason == ABORTED)
    }
}

/// How items are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Automated checks decide; manual items are skipped.
    Unattended,
    /// The operator decides through the UI.
    #[default]
    Interactive,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// One outcome per item, in order.
    pub outcomes: Vec<ItemOutcome>,
    /// Whether the run is clear to continue.
    pub success: bool,
}

/// Drives items through the state machine.
pub struct ItemExecutor<'a> {
    mode: RunMode,
    reporter: &'a OutcomeReporter<'a>,
    cancel: &'a AtomicBool,
}

impl<'a> ItemExecutor<'a> {
    /// Create an executor that stops when `cancel` is raised.
    pub fn new(mode: RunMode, reporter: &'a OutcomeReporter<'a>, cancel: &'a AtomicBool) -> Self {
        Self {
            mode,
            reporter,
            cancel,
        }
    }

    /// Run `items`, leaving the first `skip` of them blank.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSkip` before touching anything if `skip` exceeds the
    /// number of items, or a UI error if a prompt can't be shown.
    pub fn run(
        &self,
        items: &[ChecklistItem],
        skip: usize,
        ui: &mut dyn UserInterface,
        runner: &dyn CheckRunner,
    ) -> Result<RunReport> {
        if skip > items.len() {
            return Err(PreflightError::InvalidSkip {
                skip,
                total: items.len(),
            });
        }

        let mut outcomes = Vec::with_capacity(items.len());
        let mut failed = false;

        for (index, item) in items.iter().enumerate() {
            let outcome = if index < skip {
                ItemOutcome::Blank
            } else if failed {
                ItemOutcome::Skipped(ABORTED.to_string())
            } else if self.cancel.load(Ordering::SeqCst) {
                tracing::info!("Interrupted before '{}'", item.title);
                ItemOutcome::Skipped(ABORTED.to_string())
            } else {
                let outcome = match self.mode {
                    RunMode::Unattended => self.run_unattended(index, item, runner),
                    RunMode::Interactive => self.run_interactive(index, item, ui, runner)?,
                };
                self.report(item, &outcome, ui);
                outcome
            };

            failed |= outcome.is_failure();
            ui.show_item(index, item, &outcome);
            outcomes.push(outcome);
        }

        Ok(RunReport {
            outcomes,
            success: !failed,
        })
    }

    fn run_unattended(
        &self,
        index: usize,
        item: &ChecklistItem,
        runner: &dyn CheckRunner,
    ) -> ItemOutcome {
        if !item.can_check() {
            return ItemOutcome::Skipped(NO_CHECKS.to_string());
        }

        let checked = runner.run_check(index, item);
        if self.cancel.load(Ordering::SeqCst)
            || matches!(checked, Err(PreflightError::Interrupted))
        {
            return self.interrupted(item);
        }

        match checked {
            Ok(outcome) if outcome.success => ItemOutcome::Passed {
                value: outcome.value,
            },
            Ok(outcome) => ItemOutcome::Failed {
                message: "check failed".to_string(),
                stdout: outcome.stdout,
                stderr: outcome.stderr,
            },
            Err(e) => ItemOutcome::Failed {
                message: e.to_string(),
                stdout: String::new(),
                stderr: String::new(),
            },
        }
    }

    fn run_interactive(
        &self,
        index: usize,
        item: &ChecklistItem,
        ui: &mut dyn UserInterface,
        runner: &dyn CheckRunner,
    ) -> Result<ItemOutcome> {
        let verdict = match ui.check_item(index, item, runner, self.cancel) {
            Err(PreflightError::Interrupted) => return Ok(self.interrupted(item)),
            Err(e) => return Err(e),
            Ok(_) if self.cancel.load(Ordering::SeqCst) => return Ok(self.interrupted(item)),
            Ok(verdict) => verdict,
        };
        Ok(if verdict.passed {
            ItemOutcome::Passed {
                value: verdict.value,
            }
        } else {
            ItemOutcome::Failed {
                message: if item.can_check() {
                    "check failed".to_string()
                } else {
                    "not confirmed".to_string()
                },
                stdout: verdict.stdout,
                stderr: verdict.stderr,
            }
        })
    }

    fn interrupted(&self, item: &ChecklistItem) -> ItemOutcome {
        self.cancel.store(true, Ordering::SeqCst);
        tracing::info!("Interrupted during '{}'", item.title);
        ItemOutcome::Skipped(ABORTED.to_string())
    }

    fn report(&self, item: &ChecklistItem, outcome: &ItemOutcome, ui: &mut dyn UserInterface) {
        if item.runbook_link().is_none() {
            return;
        }
        let (status, note) = match outcome {
            ItemOutcome::Passed { .. } => (ItemStatus::Completed, String::new()),
            ItemOutcome::Failed { stdout, stderr, .. } => {
                (ItemStatus::Failed, failure_note(stdout, stderr))
            }
            ItemOutcome::Blank | ItemOutcome::Skipped(_) => return,
        };
        if let Err(e) = self.reporter.report(item, status, &note) {
            ui.warning(&format!("Could not report '{}' to the runbook: {}", item.title, e));
        }
    }
}
