// ABOUTME: Home directory expansion for user supplied paths.
// ABOUTME: Mirrors shell handling of a leading tilde.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a tilde, and tildes when no home directory is known, are
/// returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
