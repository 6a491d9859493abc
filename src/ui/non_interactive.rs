//! Non-interactive UI for unattended runs and non-TTY sessions.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::checklist::ChecklistItem;
use crate::error::{PreflightError, Result};
use crate::executor::ItemOutcome;
use crate::runner::CheckRunner;

use super::theme::PreflightTheme;
use super::{
    ItemVerdict, OutputMode, Prompt, PromptResult, SpinnerHandle, UserInterface, CLEAR_BANNER,
    CONFIRM_ITEM_KEY, NOT_CLEAR_BANNER,
};

/// UI implementation for non-interactive mode.
///
/// Plain text, no spinners. Prompts fall back to their defaults, manual
/// items can't be confirmed and automated checks run without asking.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: PreflightTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: PreflightTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        match &prompt.default {
            Some(default) => Ok(PromptResult::String(default.clone())),
            None => Err(PreflightError::Other(anyhow::anyhow!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            ))),
        }
    }

    fn start_spinner(&mut self, _message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(NoopSpinner)
    }

    fn show_header(&mut self, title: &str) {
        println!("{}\n", self.theme.format_header(title));
    }

    fn show_item(&mut self, index: usize, item: &ChecklistItem, outcome: &ItemOutcome) {
        println!("{}", self.theme.format_item(index, &item.title, outcome));
        match outcome {
            ItemOutcome::Failed { stdout, stderr, .. } => self.show_output_block(stdout, stderr),
            ItemOutcome::Passed { value }
                if self.mode.shows_command_output() && value.contains('\n') =>
            {
                self.show_output_block(value, "")
            }
            _ => {}
        }
    }

    fn show_output_block(&mut self, stdout: &str, stderr: &str) {
        for (label, text) in [("stdout", stdout), ("stderr", stderr)] {
            if text.trim().is_empty() {
                continue;
            }
            println!("    --- {} ---", label);
            for line in text.lines() {
                println!("    {}", line);
            }
        }
    }

    fn show_final(&mut self, success: bool) {
        println!();
        println!("{}", if success { CLEAR_BANNER } else { NOT_CLEAR_BANNER });
    }

    fn check_item(
        &mut self,
        index: usize,
        item: &ChecklistItem,
        runner: &dyn CheckRunner,
        cancel: &AtomicBool,
    ) -> Result<ItemVerdict> {
        if !item.can_check() {
            self.warning(&format!(
                "'{}' needs a manual confirmation, which a non-interactive session can't give",
                item.title
            ));
            let answer = self.prompt(&Prompt::confirm(CONFIRM_ITEM_KEY, item.title.clone()))?;
            return Ok(ItemVerdict {
                passed: answer.as_bool().unwrap_or(false),
                ..Default::default()
            });
        }

        let checked = runner.run_check(index, item);
        if cancel.load(Ordering::SeqCst) {
            return Err(PreflightError::Interrupted);
        }

        Ok(match checked {
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
        })
    }
}

struct NoopSpinner;

impl SpinnerHandle for NoopSpinner {
    fn finish_clear(&mut self) {}
}
