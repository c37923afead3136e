//! Settings file location and JSON persistence.
//!
//! Files are written atomically and readable only by the owner on Unix.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

/// File name of the settings document inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/XfinityUsage`
/// - Linux: `~/.config/xfinity-usage`
/// - Windows: `%APPDATA%\xfinity-usage`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("XfinityUsage"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("xfinity-usage"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default settings file path.
pub fn default_settings_path() -> PathBuf {
    default_config_dir().join(SETTINGS_FILE)
}

// ============================================================================
// Permissions
// ============================================================================

#[cfg(unix)]
async fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    debug!(path = %path.display(), mode = %format_args!("{mode:o}"), "Restricted permissions");
    Ok(())
}

#[cfg(not(unix))]
async fn restrict(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

/// Creates the parent directory of `path` as owner-only if it is missing.
///
/// Existing directories keep whatever permissions they have.
async fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::try_exists(parent).await? {
        return Ok(());
    }

    debug!(path = %parent.display(), "Creating config directory");
    tokio::fs::create_dir_all(parent).await?;
    restrict(parent, 0o700).await
}

// ============================================================================
// File Operations
// ============================================================================

/// Writes `data` as pretty JSON.
///
/// The document goes to a sibling temp file first and is renamed into place,
/// so a crash never leaves a half-written file. The result is mode `0600`.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if `data` cannot be encoded, or
/// `StoreError::Io` if any filesystem step fails.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    ensure_parent(path).await?;
    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    restrict(&temp_path, 0o600).await?;
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Reads a JSON document.
///
/// # Errors
///
/// Returns `StoreError::Io` if the file cannot be read, or
/// `StoreError::Serialization` if it is not valid for `T`.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

/// Reads a JSON document, falling back to `T::default()`.
///
/// A missing file is silent. A file that exists but does not parse is
/// logged before the defaults are used.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            T::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_path() {
        let path = default_settings_path();
        assert!(path.ends_with(SETTINGS_FILE));
        assert!(path.starts_with(default_config_dir()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh").join("doc.json");

        save_json(&path, &serde_json::json!({"a": 1})).await.unwrap();

        let file_mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = std::fs::metadata(path.parent().unwrap())
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(dir_mode, 0o700);
    }
}
