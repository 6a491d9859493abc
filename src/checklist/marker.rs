//! Environment requirement markers.
//!
//! An `env` value in a checklist is one of:
//!
//! - `<` - the variable must already be set (and non-empty) in the process environment
//! - `${command}` - the value is the trimmed stdout of `command` run through a shell
//! - anything else - used verbatim
//!
//! `${...}` markers execute operator-supplied text. Checklists are trusted
//! input in the same way shell scripts are.

use regex::Regex;
use std::sync::LazyLock;

/// How an `env` entry gets its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvMarker {
    /// Used verbatim.
    Literal(String),
    /// Trimmed stdout of a shell command. May be empty.
    Command(String),
    /// Must be present and non-empty in the process environment.
    Required,
}

static COMMAND_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)^\$\{(.*)\}$").unwrap());

impl EnvMarker {
    /// Classify a raw `env` value.
    pub fn parse(raw: &str) -> Self {
        if raw == "<" {
            return Self::Required;
        }
        match COMMAND_MARKER.captures(raw) {
            Some(caps) => Self::Command(caps[1].to_string()),
            None => Self::Literal(raw.to_string()),
        }
    }
}
