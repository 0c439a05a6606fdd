//! File-based storage helpers
//!
//! All persistent relay state lives in plain JSON files. Writes go through a
//! temp file followed by a rename so readers never observe a half-written
//! document.
//!
//! Global user storage (`~/.push-relay/`):
//! - `tokens.json` - Email to push token registry
//! - `config.toml` - Optional relay configuration

use std::fs;
use std::path::{Path, PathBuf};

/// Common file operations result type
pub type FileResult<T> = Result<T, String>;

/// Get the global .push-relay directory in user home
pub fn get_global_relay_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".push-relay")
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> FileResult<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| format!("Failed to create directory {:?}: {}", path, e))?;
    }
    Ok(())
}

/// Write data to a file atomically (temp file + rename)
pub fn atomic_write(path: &Path, content: &str) -> FileResult<()> {
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }

    fs::write(&temp_path, content)
        .map_err(|e| format!("Failed to write temp file {:?}: {}", temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to rename {:?} to {:?}: {}", temp_path, path, e)
    })?;

    Ok(())
}

/// Read a JSON file and deserialize it
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> FileResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;

    serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse JSON from {:?}: {}", path, e))
}

/// Write data as pretty-printed JSON atomically
pub fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> FileResult<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| format!("Failed to serialize to JSON: {}", e))?;

    atomic_write(path, &content)
}
