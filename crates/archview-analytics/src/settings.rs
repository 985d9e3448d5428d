use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::AnalyticsError;

pub const DEFAULT_BASE_URL: &str = "https://api.keywordsai.co/api";
pub const DEFAULT_SOURCE: &str = "wei-ai-assistant";
pub const API_KEY_ENV: &str = "KEYWORDS_AI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSettings {
    pub api_key: String,
    pub base_url: String,
    /// Stamped into every logged record and event.
    pub source: String,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl AnalyticsSettings {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Settings file, then `KEYWORDS_AI_API_KEY` on top.
    pub fn load() -> Self {
        let mut settings = read_settings_from(&settings_path());
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                settings.api_key = key;
            }
        }
        settings
    }
}

/// Resolve the global config directory (~/.archview/).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".archview")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Read settings from `path`. A missing or unreadable file yields defaults.
pub fn read_settings_from(path: &Path) -> AnalyticsSettings {
    if !path.exists() {
        return AnalyticsSettings::default();
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings_to(path: &Path, settings: &AnalyticsSettings) -> Result<(), AnalyticsError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}
