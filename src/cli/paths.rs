//! Path resolution for the reference database

use std::env;
use std::path::{Path, PathBuf};

/// Database file used when neither the flag nor the config names one
pub const DEFAULT_DB_FILE: &str = "marksrank.db";

/// Resolve the database path: explicit flag, then config, then
/// `marksrank.db` in the working directory. Relative paths are taken
/// from `base`.
pub fn resolve_db_path(explicit: Option<&Path>, configured: Option<&str>, base: &Path) -> PathBuf {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| configured.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Current working directory, or "." if it cannot be determined
pub fn current_dir() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
