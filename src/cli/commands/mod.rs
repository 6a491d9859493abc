//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Both commands
//! share the [`prepare`] pipeline: load, resolve the environment and expand
//! remote steps.

pub mod dispatcher;
pub mod list;
pub mod prepare;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use prepare::{prepare, Prepared};
