//! Run configuration.
//!
//! - [`PreflightConfig`] - the prepared configuration a [`Runner`](crate::runner::Runner)
//!   is built from: timeouts, temp directory and the merged checklist environment
//! - [`RunbookSettings`] - how to reach the runbook service, read from the
//!   process environment
//!
//! # Example
//!
//! ```
//! use preflighter::checklist::ChecklistFile;
//! use preflighter::config::PreflightConfig;
//!
//! let mut first = ChecklistFile::default();
//! first.filename = "base.yml".into();
//! first.env.insert("REGION".into(), "us-east-1".into());
//!
//! let mut second = ChecklistFile::default();
//! second.filename = "prod.yml".into();
//! second.env.insert("REGION".into(), "eu-west-1".into());
//!
//! let mut config = PreflightConfig::default();
//! config.add_checklist_file(&first).unwrap();
//! config.add_checklist_file(&second).unwrap();
//!
//! assert_eq!(config.env().get("REGION").map(String::as_str), Some("eu-west-1"));
//! assert_eq!(config.env_source("REGION"), Some("prod.yml"));
//! ```

pub mod run;
pub mod runbook;

pub use run::{EnvLayer, PreflightConfig, DEFAULT_CHECK_TIMEOUT, DEFAULT_ENV_TIMEOUT};
pub use runbook::{
    RunbookSettings, DEFAULT_RUNBOOK_TIMEOUT, RUNBOOK_TIMEOUT_VAR, RUNBOOK_TOKEN_VAR,
    RUNBOOK_URL_VAR,
};
