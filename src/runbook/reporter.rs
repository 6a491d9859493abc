//! Outcome reporting with retry.
//!
//! A failed report never changes an item's outcome or stops the run. The
//! reporter retries with exponential backoff and hands the final error back
//! to the caller to surface.

use std::thread;
use std::time::Duration;

use super::{ItemStatus, RunbookSynchronizer};
use crate::checklist::ChecklistItem;
use crate::error::{PreflightError, Result};

/// How hard to try before giving up on a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt number `attempt` (1-based, attempt > 1).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

/// Note attached to a failed item's report.
pub fn failure_note(stdout: &str, stderr: &str) -> String {
    format!("Script failed with:\n```\n{}\n---\n{}\n```\n", stdout, stderr)
}

/// Reports linked item outcomes to the runbook service.
pub struct OutcomeReporter<'a> {
    synchronizer: Option<&'a dyn RunbookSynchronizer>,
    policy: RetryPolicy,
}

impl<'a> OutcomeReporter<'a> {
    /// Create a reporter. `None` means no checklist uses the runbook service.
    pub fn new(synchronizer: Option<&'a dyn RunbookSynchronizer>) -> Self {
        Self {
            synchronizer,
            policy: RetryPolicy::default(),
        }
    }

    /// Use a custom retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Report `item`'s outcome if it is linked to a remote entry.
    ///
    /// Returns `Ok(false)` for unlinked items.
    ///
    /// # Errors
    ///
    /// Returns the last `RunbookUpdate` error once every attempt failed, or
    /// `RunbookConfig` if a linked item shows up without a runbook client.
    pub fn report(&self, item: &ChecklistItem, status: ItemStatus, note: &str) -> Result<bool> {
        let Some((step, id)) = item.runbook_link() else {
            return Ok(false);
        };
        let Some(synchronizer) = self.synchronizer else {
            return Err(PreflightError::RunbookConfig {
                message: format!("item '{}' is linked to step {} but no runbook client is configured", item.title, step),
            });
        };

        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match synchronizer.checklist_item_update(step, id, status, note) {
                Ok(()) => {
                    tracing::debug!("Reported {} as {} on step {}", id, status, step);
                    return Ok(true);
                }
                Err(e) if attempt < attempts => {
                    attempt += 1;
                    let delay = self.policy.delay_before(attempt);
                    tracing::debug!("{}; retrying in {:?}", e, delay);
                    thread::sleep(delay);
                }
                Err(e) => {
                    tracing::warn!("Giving up after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// Fails the first `failures` updates, then records the rest.
    #[derive(Default)]
    struct FlakyRunbook {
        failures: Cell<u32>,
        calls: Cell<u32>,
        updates: RefCell<Vec<(String, String, ItemStatus, String)>>,
    }

    impl RunbookSynchronizer for FlakyRunbook {
        fn checklist_from_runbook(&self, _: &str) -> Result<Vec<ChecklistItem>> {
            Ok(vec![])
        }

        fn checklist_item_update(
            &self,
            step: &str,
            item_id: &str,
            status: ItemStatus,
            note: &str,
        ) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(PreflightError::RunbookUpdate {
                    step: step.to_string(),
                    item: item_id.to_string(),
                    message: "HTTP 503".to_string(),
                });
            }
            self.updates.borrow_mut().push((
                step.to_string(),
                item_id.to_string(),
                status,
                note.to_string(),
            ));
            Ok(())
        }
    }

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    fn linked(title: &str) -> ChecklistItem {
        ChecklistItem {
            title: title.to_string(),
            runbook_id: Some("a1".to_string()),
            runbook_step: Some("s1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn failure_note_embeds_both_streams() {
        assert_eq!(
            failure_note("out", "err"),
            "Script failed with:\n```\nout\n---\nerr\n```\n"
        );
    }

    #[test]
    fn backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(2), Duration::from_millis(250));
        assert_eq!(policy.delay_before(3), Duration::from_millis(500));
        assert_eq!(policy.delay_before(4), Duration::from_millis(1000));
    }

    #[test]
    fn unlinked_items_are_not_reported() {
        let runbook = FlakyRunbook::default();
        let reporter = OutcomeReporter::new(Some(&runbook));

        let reported = reporter
            .report(&ChecklistItem::manual("local"), ItemStatus::Completed, "")
            .unwrap();

        assert!(!reported);
        assert_eq!(runbook.calls.get(), 0);
    }

    #[test]
    fn reports_linked_items() {
        let runbook = FlakyRunbook::default();
        let reporter = OutcomeReporter::new(Some(&runbook)).with_policy(no_wait());

        assert!(reporter
            .report(&linked("x"), ItemStatus::Failed, "note")
            .unwrap());

        let updates = runbook.updates.borrow();
        assert_eq!(
            updates[0],
            ("s1".into(), "a1".into(), ItemStatus::Failed, "note".into())
        );
    }

    #[test]
    fn retries_until_success() {
        let runbook = FlakyRunbook::default();
        runbook.failures.set(2);
        let reporter = OutcomeReporter::new(Some(&runbook)).with_policy(no_wait());

        assert!(reporter
            .report(&linked("x"), ItemStatus::Completed, "")
            .unwrap());
        assert_eq!(runbook.calls.get(), 3);
    }

    #[test]
    fn gives_up_after_all_attempts() {
        let runbook = FlakyRunbook::default();
        runbook.failures.set(10);
        let reporter = OutcomeReporter::new(Some(&runbook)).with_policy(no_wait());

        let err = reporter
            .report(&linked("x"), ItemStatus::Completed, "")
            .unwrap_err();

        assert!(matches!(err, PreflightError::RunbookUpdate { .. }));
        assert_eq!(runbook.calls.get(), 3);
    }

    #[test]
    fn linked_item_without_client_is_config_error() {
        let reporter = OutcomeReporter::new(None);
        let err = reporter
            .report(&linked("x"), ItemStatus::Completed, "")
            .unwrap_err();
        assert!(matches!(err, PreflightError::RunbookConfig { .. }));
    }
}
