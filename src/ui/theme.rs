//! Visual theme and styling.

use console::Style;

use crate::executor::ItemOutcome;

/// Preflighter's visual theme.
#[derive(Debug, Clone)]
pub struct PreflightTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
    /// Style for box-drawing borders (dim).
    pub border: Style,
}

impl Default for PreflightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PreflightTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().magenta(),
            border: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            border: Style::new(),
        }
    }

    /// Pick the colored or plain theme.
    pub fn for_colors(colors: bool) -> Self {
        if colors {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a skipped message (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format the checklist banner.
    pub fn format_header(&self, title: &str) -> String {
        let rule = self.border.apply_to("==========");
        format!("{}\n {}\n{}", rule, self.header.apply_to(title), rule)
    }

    /// Format one item line for its outcome. `index` is 0-based.
    pub fn format_item(&self, index: usize, title: &str, outcome: &ItemOutcome) -> String {
        let label = format!("{:>2}. {}", index + 1, title);
        match outcome {
            ItemOutcome::Blank => format!("{}", self.dim.apply_to(format!("  {}", label))),
            ItemOutcome::Skipped(reason) => {
                self.format_skipped(&format!("{} [{}]", label, reason))
            }
            ItemOutcome::Passed { value } if value.is_empty() => self.format_success(&label),
            ItemOutcome::Passed { value } => format!(
                "{} {}",
                self.format_success(&label),
                self.dim.apply_to(format!("({})", first_line(value)))
            ),
            ItemOutcome::Failed { message, .. } => format!(
                "{}\n     {}",
                self.format_error(&label),
                self.error.apply_to(message)
            ),
        }
    }
}

fn first_line(value: &str) -> &str {
    value.lines().next().unwrap_or_default()
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
