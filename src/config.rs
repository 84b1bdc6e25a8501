//! User settings persisted to a `settings.toml` file in the platform config
//! directory (e.g. `~/.config/genpix/settings.toml` on Linux).
//!
//! ```no_run
//! use genpix::config::{self, Settings};
//! use genpix::theme::ThemeMode;
//!
//! let mut settings = config::load().unwrap_or_default();
//! settings.theme = Some(ThemeMode::Dark);
//! config::save(&settings).expect("failed to save settings");
//! ```

use crate::error::Result;
use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "genpix";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Stored theme preference; `None` defers to the system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,
}

/// Location of the settings file, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Settings> {
    match default_config_path() {
        Some(path) => load_from_path(&path),
        None => Ok(Settings::default()),
    }
}

pub fn save(settings: &Settings) -> Result<()> {
    if let Some(path) = default_config_path() {
        return save_to_path(settings, &path);
    }
    Ok(())
}

/// Loads settings; a missing file yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(settings)?;
    fs::write(path, content)?;
    Ok(())
}
