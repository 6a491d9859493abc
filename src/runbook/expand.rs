//! Remote step expansion.

use super::RunbookSynchronizer;
use crate::checklist::ChecklistFile;
use crate::error::Result;

/// Append each file's remote step items to its checklist.
///
/// Files are processed in order, and so are the steps within a file. Fetched
/// items land after the file's own items in fetch order. The first fetch
/// failure aborts expansion.
pub fn expand_runbook_steps(
    files: &mut [ChecklistFile],
    synchronizer: &dyn RunbookSynchronizer,
) -> Result<()> {
    for file in files.iter_mut() {
        for step in &file.runbook_steps {
            let items = synchronizer.checklist_from_runbook(step)?;
            tracing::debug!(
                "Appending {} items from step {} to {}",
                items.len(),
                step,
                file.filename
            );
            file.checklist.extend(items);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::{flatten_items, runbook_checklist, ChecklistItem};
    use crate::error::PreflightError;
    use crate::runbook::ItemStatus;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeRunbook {
        steps: HashMap<String, Vec<String>>,
        fetched: RefCell<Vec<String>>,
    }

    impl FakeRunbook {
        fn step(mut self, step: &str, titles: &[&str]) -> Self {
            self.steps.insert(
                step.to_string(),
                titles.iter().map(|t| t.to_string()).collect(),
            );
            self
        }
    }

    impl RunbookSynchronizer for FakeRunbook {
        fn checklist_from_runbook(&self, step: &str) -> Result<Vec<ChecklistItem>> {
            self.fetched.borrow_mut().push(step.to_string());
            let titles = self.steps.get(step).ok_or_else(|| PreflightError::RunbookFetch {
                step: step.to_string(),
                message: "HTTP 404".to_string(),
            })?;
            Ok(titles
                .iter()
                .enumerate()
                .map(|(i, title)| ChecklistItem {
                    title: title.clone(),
                    runbook_id: Some(format!("{}-{}", step, i)),
                    runbook_step: Some(step.to_string()),
                    ..Default::default()
                })
                .collect())
        }

        fn checklist_item_update(&self, _: &str, _: &str, _: ItemStatus, _: &str) -> Result<()> {
            Ok(())
        }
    }

    fn local(name: &str, items: &[&str], steps: &[&str]) -> ChecklistFile {
        ChecklistFile {
            title: name.to_string(),
            filename: format!("{}.yml", name),
            checklist: items.iter().map(|t| ChecklistItem::manual(*t)).collect(),
            runbook_steps: steps.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn appends_in_file_then_step_order() {
        let runbook = FakeRunbook::default()
            .step("s1", &["r1", "r2"])
            .step("s2", &["r3"])
            .step("s3", &["r4"]);
        let mut files = vec![
            local("a", &["a1", "a2"], &["s1", "s2"]),
            local("b", &["b1"], &["s3"]),
        ];

        expand_runbook_steps(&mut files, &runbook).unwrap();

        let titles: Vec<_> = flatten_items(&files)
            .iter()
            .map(|i| i.title.clone())
            .collect();
        assert_eq!(titles, vec!["a1", "a2", "r1", "r2", "r3", "b1", "r4"]);
        assert_eq!(*runbook.fetched.borrow(), vec!["s1", "s2", "s3"]);
    }

    #[test]
    fn synthetic_checklist_holds_only_its_step() {
        let runbook = FakeRunbook::default().step("deploy-step-7", &["one", "two"]);
        let mut files = vec![runbook_checklist("deploy-step-7")];

        expand_runbook_steps(&mut files, &runbook).unwrap();

        assert_eq!(files[0].checklist.len(), 2);
        assert!(files[0]
            .checklist
            .iter()
            .all(|i| i.runbook_step.as_deref() == Some("deploy-step-7")));
    }

    #[test]
    fn fetch_failure_aborts() {
        let runbook = FakeRunbook::default().step("s1", &["r1"]);
        let mut files = vec![local("a", &[], &["missing", "s1"])];

        let err = expand_runbook_steps(&mut files, &runbook).unwrap_err();

        assert!(matches!(err, PreflightError::RunbookFetch { .. }));
        assert_eq!(*runbook.fetched.borrow(), vec!["missing"]);
    }
}
