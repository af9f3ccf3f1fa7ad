use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BankDashError, Result};

/// Launch configuration for the dashboard. None of the in-app settings forms
/// write here; this file only shapes how the dashboard starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_start_page")]
    pub start_page: String,
    #[serde(default)]
    pub sidebar_collapsed: bool,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// How the overview draws spending at launch: pie, bar or line.
    #[serde(default = "default_spending_chart")]
    pub spending_chart: String,
}

fn default_start_page() -> String {
    "/".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_spending_chart() -> String {
    "pie".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            start_page: default_start_page(),
            sidebar_collapsed: false,
            currency_symbol: default_currency_symbol(),
            spending_chart: default_spending_chart(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("bankdash")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Like [`read_settings`], but an unreadable file is logged and replaced by
/// defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    read_settings(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "settings unreadable, using defaults");
        Settings::default()
    })
}

/// A missing file yields defaults; a file that can't be read or parsed is
/// an error.
pub fn read_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| BankDashError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
