//! Executable lookup.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Whether a file has an executable permission bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Split a `PATH`-style value into its entries.
pub fn split_path(path: Option<&OsStr>) -> Vec<PathBuf> {
    path.map(|p| std::env::split_paths(p).collect())
        .unwrap_or_default()
}

/// Resolve a tool to an executable file.
///
/// Names containing a path separator are checked directly; bare names are
/// searched for in `path_entries` in order.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return (direct.is_file() && is_executable(direct)).then(|| direct.to_path_buf());
    }

    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Every tool in `required` that can't be resolved.
pub fn missing_tools<'a, I>(required: I, path_entries: &[PathBuf]) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    required
        .into_iter()
        .filter(|tool| resolve_tool_path(tool, path_entries).is_none())
        .cloned()
        .collect()
}
