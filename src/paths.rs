//! Downloads-folder detection.

use std::path::PathBuf;

/// Auto-detects the downloads folder for the current user.
///
/// Tries the platform downloads directory first, then common folder names
/// under the home directory, and falls back to the home directory itself.
/// Returns `None` only when no home directory can be determined.
pub fn detect_downloads_dir() -> Option<PathBuf> {
    if let Some(dir) = dirs::download_dir()
        && dir.is_dir()
    {
        return Some(dir);
    }

    let home = dirs::home_dir()?;
    for name in ["Downloads", "downloads", "Desktop"] {
        let candidate = home.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
    }

    tracing::warn!(
        home = %home.display(),
        "could not find a downloads folder, using the home directory"
    );
    Some(home)
}
