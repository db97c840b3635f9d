//! Saved defaults for the `treelist` command.
//!
//! A small JSON file remembers which database file the commands use when
//! `--store` is not given. `treelist config --set-store` writes it.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use treelist_core::Result;

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "TREELIST_CONFIG";

/// What `treelist config` remembers between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliSettings {
    /// Database file used when `--store` is omitted.
    pub store_path: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            store_path: default_store_path().to_string_lossy().to_string(),
        }
    }
}

/// `$TREELIST_CONFIG` when set and non-empty, else `treelist/settings.json`
/// inside the platform config directory (`~/.config` on Linux).
pub fn settings_file_path() -> PathBuf {
    resolve_settings_path(std::env::var_os(CONFIG_ENV), dirs::config_dir())
}

fn resolve_settings_path(configured: Option<OsString>, config_dir: Option<PathBuf>) -> PathBuf {
    match configured.filter(|path| !path.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => config_dir
            .unwrap_or_else(|| PathBuf::from("."))
            .join("treelist")
            .join("settings.json"),
    }
}

/// Returns the default store file: `<data dir>/treelist/items.db`.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("treelist")
        .join("items.db")
}

/// Loads settings from the default location.
pub fn load_settings() -> CliSettings {
    load_settings_from(&settings_file_path())
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from(path: &Path) -> CliSettings {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt settings file {}: {e}", path.display());
            CliSettings::default()
        }),
        Err(_) => CliSettings::default(),
    }
}

/// Writes `settings` to [`settings_file_path`].
pub fn save_settings(settings: &CliSettings) -> Result<()> {
    save_settings_to(&settings_file_path(), settings)
}

/// Writes `settings` as pretty JSON to `path`. Missing directories are created.
pub fn save_settings_to(path: &Path, settings: &CliSettings) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    log::debug!("Saved settings to {}", path.display());
    Ok(())
}
