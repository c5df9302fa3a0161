use crate::kernel::services::ports::settings::{Preferences, Settings};
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_DIR: &str = ".codeforge";
const SETTINGS_FILE: &str = "settings.json";
pub const API_URL_ENV: &str = "CODEFORGE_API_URL";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot determine settings directory")]
    NoSettingsDir,
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Writes default settings when the file does not exist yet.
pub fn ensure_settings_file_at(path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&Settings::default())?;
        std::fs::write(path, content)?;
    }
    Ok(())
}

pub fn ensure_settings_file() -> Result<PathBuf, SettingsError> {
    let path = get_settings_path().ok_or(SettingsError::NoSettingsDir)?;
    ensure_settings_file_at(&path)?;
    Ok(path)
}

pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Settings from disk (defaults when missing or unreadable), with the
/// environment override applied.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = match path {
        Some(path) => load_settings_from(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "using default settings");
            Settings::default()
        }),
        None => Settings::default(),
    };
    apply_env_overrides(&mut settings, std::env::var(API_URL_ENV).ok());
    settings
}

pub fn apply_env_overrides(settings: &mut Settings, api_url: Option<String>) {
    if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
        settings.assistant.base_url = url.trim().to_string();
    }
}

/// Replaces the `preferences` section, keeping everything else in the file.
pub fn save_preferences(path: &Path, preferences: &Preferences) -> Result<(), SettingsError> {
    let mut settings = if path.exists() {
        load_settings_from(path)?
    } else {
        Settings::default()
    };
    settings.preferences = preferences.clone();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // 先写临时文件再 rename，读者不会看到写了一半的 JSON
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(&settings)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/settings.rs"]
mod tests;
