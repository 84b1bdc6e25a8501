//! Light/dark theme preference.

use crate::config::{self, Settings};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(is_dark: bool) -> Self {
        if is_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        Self::from_dark(!self.is_dark())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Icon offered for switching away from this mode.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "sun",
            Self::Light => "moon",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the desktop asks for dark mode. Detection errors count as "no".
pub fn system_prefers_dark() -> bool {
    matches!(dark_light::detect(), Ok(dark_light::Mode::Dark))
}

/// Holds the active theme and writes every change back to the settings file.
#[derive(Debug, Clone)]
pub struct ThemeController {
    path: Option<PathBuf>,
    mode: ThemeMode,
}

impl ThemeController {
    /// Loads from the default settings file, falling back to `system_prefers_dark`.
    pub fn load(system_prefers_dark: bool) -> Self {
        Self::with_path(config::default_config_path(), system_prefers_dark)
    }

    pub fn load_from_path(path: impl Into<PathBuf>, system_prefers_dark: bool) -> Self {
        Self::with_path(Some(path.into()), system_prefers_dark)
    }

    fn with_path(path: Option<PathBuf>, system_prefers_dark: bool) -> Self {
        let stored = path.as_deref().and_then(|p| match config::load_from_path(p) {
            Ok(settings) => settings.theme,
            Err(e) => {
                tracing::warn!(path = %p.display(), "ignoring unreadable settings: {e}");
                None
            }
        });
        let mode = stored.unwrap_or_else(|| ThemeMode::from_dark(system_prefers_dark));
        tracing::debug!(%mode, stored = stored.is_some(), "theme loaded");

        Self { path, mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    pub fn icon(&self) -> &'static str {
        self.mode.icon()
    }

    /// Flips the theme and persists the new value.
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        self.mode = self.mode.toggled();
        self.persist()?;
        Ok(self.mode)
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut settings = config::load_from_path(path).unwrap_or_else(|_| Settings::default());
        settings.theme = Some(self.mode);
        config::save_to_path(&settings, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn system_preference_applies_without_stored_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        assert_eq!(
            ThemeController::load_from_path(&path, true).mode(),
            ThemeMode::Dark
        );
        assert_eq!(
            ThemeController::load_from_path(&path, false).mode(),
            ThemeMode::Light
        );
    }

    #[test]
    fn stored_value_wins_over_system() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        config::save_to_path(
            &Settings {
                theme: Some(ThemeMode::Light),
            },
            &path,
        )
        .unwrap();

        let controller = ThemeController::load_from_path(&path, true);
        assert_eq!(controller.mode(), ThemeMode::Light);
        assert_eq!(controller.icon(), "moon");
    }

    #[test]
    fn toggle_twice_restores_and_persists_across_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut controller = ThemeController::load_from_path(&path, false);
        assert_eq!(controller.toggle().unwrap(), ThemeMode::Dark);
        assert_eq!(controller.icon(), "sun");

        // Reload: the stored value overrides a light system preference.
        let mut reloaded = ThemeController::load_from_path(&path, false);
        assert!(reloaded.is_dark());

        assert_eq!(reloaded.toggle().unwrap(), ThemeMode::Light);
        assert_eq!(
            ThemeController::load_from_path(&path, true).mode(),
            ThemeMode::Light
        );
    }

    #[test]
    fn corrupt_settings_count_as_no_preference() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "theme = [").unwrap();

        let mut controller = ThemeController::load_from_path(&path, true);
        assert!(controller.is_dark());

        controller.toggle().unwrap();
        assert_eq!(
            config::load_from_path(&path).unwrap().theme,
            Some(ThemeMode::Light)
        );
    }

    #[test]
    fn mode_strings() {
        assert_eq!(ThemeMode::Dark.to_string(), "dark");
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }
}
