//! List command implementation.
//!
//! Prints every item with its running number, grouped by checklist.

use crate::checklist::ChecklistFile;
use crate::cli::args::Cli;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::prepare::prepare;

/// The list command implementation.
pub struct ListCommand {
    cli: Cli,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let prepared = prepare(&self.cli.sources, self.cli.env_timeout(), ui)?;
        for line in listing(&prepared.files) {
            ui.message(&line);
        }
        Ok(CommandResult::success())
    }
}

/// Listing lines; numbering continues across checklists.
pub fn listing(files: &[ChecklistFile]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut number = 0;
    for file in files {
        lines.push(format!("In {} ({}):", file.filename, file.title));
        for item in &file.checklist {
            number += 1;
            lines.push(format!(" {:>2}. {}", number, item.title));
        }
        lines.push(String::new());
    }
    lines.push(format!("{} items in total", number));
    lines
}
