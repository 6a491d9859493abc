//! Preflighter - ordered, fail-stopping pre-flight checklists.
//!
//! Operators describe the checks that must pass before a risky operation
//! in YAML checklists. Preflighter resolves each checklist's environment,
//! optionally pulls extra items from a remote runbook service, makes sure
//! the executables checks rely on are installed, and then walks every item
//! in order. The first failure stops the run.
//!
//! # Modules
//!
//! - [`checklist`] - Checklist files, items and loading
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Run configuration and runbook settings
//! - [`environment`] - Environment requirement resolution
//! - [`error`] - Error types and result aliases
//! - [`executor`] - Per-item state machine
//! - [`runbook`] - Remote runbook fetching and outcome reporting
//! - [`runner`] - Check script execution and tool availability
//! - [`shell`] - Shell command execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use preflighter::checklist::{flatten_items, parse_checklist};
//!
//! let yaml = "title: Deploy\nchecklist:\n  - title: Announce the deploy\n";
//! let file = parse_checklist(yaml, Path::new("deploy.yml")).unwrap();
//! let items = flatten_items(&[file]);
//! assert_eq!(items[0].title, "Announce the deploy");
//! assert!(!items[0].can_check());
//! ```

pub mod checklist;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod executor;
pub mod runbook;
pub mod runner;
pub mod shell;
pub mod ui;

pub use error::{PreflightError, Result};
