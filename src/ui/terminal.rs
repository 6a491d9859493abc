//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::checklist::ChecklistItem;
use crate::error::Result;
use crate::executor::ItemOutcome;

use super::{
    prompt_user, should_use_colors, NonInteractiveUI, OutputMode, PreflightTheme,
    ProgressSpinner, Prompt, PromptResult, SpinnerHandle, UserInterface, CLEAR_BANNER,
    NOT_CLEAR_BANNER,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: PreflightTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        Self {
            term: Term::stdout(),
            theme: PreflightTheme::for_colors(!no_color && should_use_colors()),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term, "{}\n", self.theme.format_header(title)).ok();
    }

    fn show_item(&mut self, index: usize, item: &ChecklistItem, outcome: &ItemOutcome) {
        writeln!(
            self.term,
            "{}",
            self.theme.format_item(index, &item.title, outcome)
        )
        .ok();
        if let ItemOutcome::Passed { value } = outcome {
            if self.mode.shows_command_output() && value.contains('\n') {
                self.show_output_block(value, "");
            }
        }
    }

    fn show_output_block(&mut self, stdout: &str, stderr: &str) {
        let b = &self.theme.border;
        for (label, text) in [("stdout", stdout), ("stderr", stderr)] {
            if text.trim().is_empty() {
                continue;
            }
            writeln!(
                self.term,
                "    {} {}",
                b.apply_to("┌─"),
                b.apply_to(format!("{} ────────────────────────────", label))
            )
            .ok();
            for line in text.lines() {
                writeln!(self.term, "    {} {}", b.apply_to("│"), line).ok();
            }
            writeln!(
                self.term,
                "    {}",
                b.apply_to("└────────────────────────────────────")
            )
            .ok();
        }
    }

    fn show_final(&mut self, success: bool) {
        writeln!(self.term).ok();
        if success {
            writeln!(self.term, "{}", self.theme.success.apply_to(CLEAR_BANNER)).ok();
        } else {
            writeln!(self.term, "{}", self.theme.error.apply_to(NOT_CLEAR_BANNER)).ok();
        }
    }
}

/// Create the appropriate UI based on context.
///
/// Interactive runs only get a terminal UI when stdout is a terminal.
pub fn create_ui(interactive: bool, mode: OutputMode, no_color: bool) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode, no_color))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
