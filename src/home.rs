//! Home directory resolution.
//!
//! The mirror file lives in a per-user directory: `~/.dep` when the user's
//! home can be determined, `<cwd>/.dep` when it cannot, and the relative path
//! `.dep` as a last resort. Resolution never fails.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::defaults::{HOME_DIR_NAME, MIRRORS_FILENAME};

static HOME: OnceLock<PathBuf> = OnceLock::new();

/// Returns the dep home directory, resolving it on first use.
///
/// The result is cached for the remainder of the process.
pub fn home() -> &'static Path {
    HOME.get_or_init(|| {
        let dir = resolve_home(dirs::home_dir(), std::env::current_dir().ok());
        log::debug!("Resolved dep home to {}", dir.display());
        dir
    })
}

/// Uncached resolution from an optional user home and working directory.
pub fn resolve_home(user_home: Option<PathBuf>, cwd: Option<PathBuf>) -> PathBuf {
    user_home
        .or(cwd)
        .map(|base| base.join(HOME_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(HOME_DIR_NAME))
}

/// Path of the mirror file inside `home`.
pub fn mirrors_path(home: &Path) -> PathBuf {
    home.join(MIRRORS_FILENAME)
}
