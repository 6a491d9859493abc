//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use preflighter::checklist::ChecklistItem;
//! use preflighter::executor::ItemOutcome;
//! use preflighter::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_item(0, &ChecklistItem::manual("Announce"), &ItemOutcome::Blank);
//! ui.show_final(true);
//!
//! assert_eq!(ui.items()[0].2, ItemOutcome::Blank);
//! assert_eq!(ui.finals(), &[true]);
//! ```

use std::collections::{HashMap, VecDeque};

use crate::checklist::ChecklistItem;
use crate::error::{PreflightError, Result};
use crate::executor::ItemOutcome;

use super::{Prompt, PromptResult, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked multiple times.
#[derive(Debug, Default)]
pub struct MockUI {
    messages: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<String>,
    items: Vec<(usize, String, ItemOutcome)>,
    output_blocks: Vec<(String, String)>,
    finals: Vec<bool>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
    interrupt_prompts: bool,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order. After the queue is exhausted,
    /// falls back to `set_prompt_response` or the prompt's default.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Make every prompt fail as if the operator pressed Ctrl-C.
    pub fn interrupt_prompts(&mut self) {
        self.interrupt_prompts = true;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Get every rendered item as `(index, title, outcome)`.
    pub fn items(&self) -> &[(usize, String, ItemOutcome)] {
        &self.items
    }

    /// Get the rendered outcomes in order.
    pub fn outcomes(&self) -> Vec<ItemOutcome> {
        self.items.iter().map(|(_, _, o)| o.clone()).collect()
    }

    /// Get every output block as `(stdout, stderr)`.
    pub fn output_blocks(&self) -> &[(String, String)] {
        &self.output_blocks
    }

    /// Get every final verdict shown.
    pub fn finals(&self) -> &[bool] {
        &self.finals
    }

    /// Get the keys of all prompts shown, in order.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());
        if self.interrupt_prompts {
            return Err(PreflightError::Interrupted);
        }

        let queued = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(|queue| queue.pop_front());
        let response = queued
            .or_else(|| self.prompt_responses.get(&prompt.key).cloned())
            .or_else(|| prompt.default.clone())
            .unwrap_or_default();

        Ok(PromptResult::String(response))
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_item(&mut self, index: usize, item: &ChecklistItem, outcome: &ItemOutcome) {
        self.items
            .push((index, item.title.clone(), outcome.clone()));
    }

    fn show_output_block(&mut self, stdout: &str, stderr: &str) {
        self.output_blocks
            .push((stdout.to_string(), stderr.to_string()));
    }

    fn show_final(&mut self, success: bool) {
        self.finals.push(success);
    }
}

/// Spinner that does nothing.
#[derive(Debug, Default)]
pub struct MockSpinner;

impl SpinnerHandle for MockSpinner {
    fn finish_clear(&mut self) {}
}
