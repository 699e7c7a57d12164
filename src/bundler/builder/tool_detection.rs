//! External tool detection and availability checking.
//!
//! The disk image facility shells out to `hdiutil` for image creation and
//! `osascript` for Finder window layout. Both are located once per process.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Location of `hdiutil`, if installed.
///
/// Cached result to avoid repeated PATH lookups during assembly.
pub static HDIUTIL: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("hdiutil"));

/// Location of `osascript`, if installed.
pub static OSASCRIPT: LazyLock<Option<PathBuf>> = LazyLock::new(|| locate("osascript"));

fn locate(tool: &str) -> Option<PathBuf> {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            None
        }
    }
}
