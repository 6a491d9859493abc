//! Remote runbook synchronization.
//!
//! A runbook service owns checklist items for named steps. Checklists pull
//! those items in before a run and report each linked item's outcome back
//! as it completes.
//!
//! - [`RunbookSynchronizer`] - the capability the rest of the crate talks to
//! - [`RunbookClient`] - the HTTP implementation
//! - [`expand_runbook_steps`] - append fetched items to their checklists
//! - [`OutcomeReporter`] - report outcomes with retry, never aborting the run

pub mod client;
pub mod expand;
pub mod reporter;

pub use client::RunbookClient;
pub use expand::expand_runbook_steps;
pub use reporter::{failure_note, OutcomeReporter, RetryPolicy};

use serde::{Deserialize, Serialize};

use crate::checklist::ChecklistItem;
use crate::error::Result;

/// Outcome reported for a linked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The item passed.
    Completed,
    /// The item failed.
    Failed,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Completed => write!(f, "completed"),
            ItemStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Fetches remote checklist items and records item outcomes.
pub trait RunbookSynchronizer {
    /// Fetch the ordered items of a remote step.
    ///
    /// Every returned item is linked to `step` and its remote id.
    fn checklist_from_runbook(&self, step: &str) -> Result<Vec<ChecklistItem>>;

    /// Record an item's outcome. `note` is empty on success.
    fn checklist_item_update(
        &self,
        step: &str,
        item_id: &str,
        status: ItemStatus,
        note: &str,
    ) -> Result<()>;
}
