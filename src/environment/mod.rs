//! Checklist environment resolution.
//!
//! Every `env` entry of every loaded checklist is resolved before any item
//! runs. Failures are collected across all files so the operator sees every
//! missing or broken requirement in one pass.

pub mod resolver;

pub use resolver::{
    resolve_environment, CommandRunner, EnvLookup, EnvironmentResolver, ShellCommandRunner,
};
