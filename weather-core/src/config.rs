use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{model::Coordinates, recency};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_CLIMATE_URL: &str = "https://pro.openweathermap.org";

/// Provider endpoints. Overridable so tests and proxies can point elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Current conditions, 3-hour forecast and geocoding.
    pub base_url: String,
    /// 30-day climate forecast (paid plan).
    pub climate_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            climate_url: DEFAULT_CLIMATE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecencyConfig {
    pub limit: usize,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self { limit: recency::DEFAULT_LIMIT }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Pause between consecutive requests when refreshing several favorites.
    pub favorites_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { favorites_delay_ms: 100, timeout_secs: 10 }
    }
}

/// Everything the provider client needs; built from [`Config`] and handed to it.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub endpoints: Endpoints,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoints: Endpoints::default(),
            timeout: Duration::from_secs(FetchConfig::default().timeout_secs),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [home]
/// lat = 50.45
/// lon = 30.52
///
/// [fetch]
/// favorites_delay_ms = 100
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    /// Used when no city is given on the command line.
    pub home: Option<Coordinates>,
    pub endpoints: Endpoints,
    pub recency: RecencyConfig,
    pub fetch: FetchConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for history, favorites and preferences.
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn favorites_delay(&self) -> Duration {
        Duration::from_millis(self.fetch.favorites_delay_ms)
    }

    /// Settings for the provider client; errors with a hint when no key is set.
    pub fn provider_settings(&self) -> Result<ProviderSettings> {
        let api_key = self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weather configure` and enter your OpenWeather API key."
            )
        })?;

        Ok(ProviderSettings {
            api_key: api_key.to_string(),
            endpoints: self.endpoints.clone(),
            timeout: Duration::from_secs(self.fetch.timeout_secs),
        })
    }
}
