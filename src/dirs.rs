//! Base directory resolution for the durable tier.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Directory name appended to every platform default.
pub const CACHE_DIR_NAME: &str = "tiercache";

/// Default base directory for the host platform.
///
/// | Platform | Directory                              |
/// |----------|----------------------------------------|
/// | macOS    | `$HOME/Library/Caches/tiercache`       |
/// | Windows  | `<current dir>/tiercache`              |
/// | other    | `/var/tmp/tiercache`                   |
pub fn default_base_directory() -> PathBuf {
    if cfg!(target_os = "macos") {
        for_macos(env::var_os("HOME").map(PathBuf::from))
    } else if cfg!(windows) {
        for_windows(env::current_dir().ok())
    } else {
        for_unix()
    }
}

fn for_macos(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_else(env::temp_dir)
        .join("Library")
        .join("Caches")
        .join(CACHE_DIR_NAME)
}

fn for_unix() -> PathBuf {
    PathBuf::from("/var/tmp").join(CACHE_DIR_NAME)
}

fn for_windows(current_dir: Option<PathBuf>) -> PathBuf {
    current_dir.unwrap_or_else(env::temp_dir).join(CACHE_DIR_NAME)
}

/// Creates `path` and any missing parents.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)?;
    debug!(path = %path.display(), "cache directory ready");
    Ok(())
}

/// Removes `path` recursively, logging instead of failing.
pub fn remove_dir_best_effort(path: &Path) {
    if let Err(err) = fs::remove_dir_all(path)
        && err.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %err, "failed to remove cache directory");
    }
}
