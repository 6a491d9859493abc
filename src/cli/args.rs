//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::executor::RunMode;
use crate::ui::OutputMode;

/// Preflighter - run pre-flight checklists before risky operations.
#[derive(Debug, Clone, Parser)]
#[command(name = "preflighter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Checklist files, or `runbook:<step>` for a remote step's checklist
    #[arg(value_name = "CHECKLIST")]
    pub sources: Vec<String>,

    /// Directory for check scripts (created if missing, kept afterwards)
    #[arg(long = "temp", value_name = "DIR")]
    pub temp: Option<PathBuf>,

    /// Leave the first N items blank without running them
    #[arg(short = 's', long = "skip", value_name = "N", default_value_t = 0)]
    pub skip: usize,

    /// List all items and exit
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Run unattended: automated checks decide, manual items are skipped
    #[arg(short = 'a', long = "automated")]
    pub automated: bool,

    /// Seconds allowed for each `${...}` environment command
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub env_timeout: u64,

    /// Seconds allowed for a check that doesn't set its own timeout
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub check_timeout: u64,

    /// Also show the output of passing checks
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show items and the final verdict
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode from `-v` / `-q`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }

    /// How items are decided.
    pub fn run_mode(&self) -> RunMode {
        if self.automated {
            RunMode::Unattended
        } else {
            RunMode::Interactive
        }
    }

    /// Time budget per environment command.
    pub fn env_timeout(&self) -> Duration {
        Duration::from_secs(self.env_timeout)
    }

    /// Default time budget per check.
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout)
    }
}
