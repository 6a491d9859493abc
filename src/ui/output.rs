//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also show the output of passing checks.
    Verbose,
    /// Show progress, items and status.
    #[default]
    Normal,
    /// Show items and the final verdict only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows check output for passing items.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress spinners.
    pub fn shows_spinners(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }
}
