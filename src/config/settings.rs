//! Application settings and configuration types.
//!
//! Settings are persisted to `~/.config/rowlist/settings.json` (or XDG
//! equivalent) and loaded at application startup. A missing or unreadable
//! file falls back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PageSizeOption, DEFAULT_PAGE_SIZES};
use crate::services::{DisplayMode, DEFAULT_REQUEST_DELAY};

/// Errors that can occur while loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for [`Settings`].
    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Row list loading behaviour.
    pub row_list: RowListSettings,
    /// Display mode preferences.
    pub display: DisplaySettings,
}

/// Row list loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowListSettings {
    /// Debounce delay before a list fetch starts, in milliseconds.
    pub request_delay_ms: u64,
    /// Page size used by lists that do not choose their own.
    pub default_page_size: u32,
    /// Page sizes offered by the pagination control.
    pub page_size_options: Vec<u32>,
}

impl Default for RowListSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            default_page_size: 20,
            page_size_options: DEFAULT_PAGE_SIZES.to_vec(),
        }
    }
}

impl RowListSettings {
    /// The debounce delay as a [`Duration`].
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// The page size selector entries.
    pub fn page_size_options(&self) -> Vec<PageSizeOption> {
        PageSizeOption::from_sizes(&self.page_size_options)
    }
}

/// Display mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Initial display mode.
    pub display_mode: DisplayMode,
}

impl Settings {
    /// Path of the settings file in the platform config directory.
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        directories::ProjectDirs::from("com", "rowlist", "rowlist")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or(SettingsError::NoConfigDir)
    }

    /// Loads settings from the default location.
    ///
    /// Returns default settings if the file doesn't exist or is corrupted.
    pub fn load() -> Self {
        match Self::default_path().and_then(|path| Self::load_from(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Loads and validates settings from `path`. A missing file yields
    /// the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.validate();
        Ok(settings)
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replaces nonsensical values with defaults.
    pub fn validate(&mut self) {
        let defaults = RowListSettings::default();
        let row_list = &mut self.row_list;

        row_list.page_size_options.retain(|size| *size > 0);
        if row_list.page_size_options.is_empty() {
            row_list.page_size_options = defaults.page_size_options;
        }

        if row_list.default_page_size == 0 {
            row_list.default_page_size = defaults.default_page_size;
        }
    }
}
