use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::{
    APP_DIR_NAME, DEFAULT_SHARE_BASE_URL, PERSIST_INTERVAL_SECS, SHARE_QUERY_KEY,
    VIEW_THRESHOLD_SECS,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote counting worker. Without a URL every remote call is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Per-request timeout. Requests never time out when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl WorkerConfig {
    /// Configured URL, treating a blank string as unset.
    pub fn url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_view_threshold")]
    pub view_threshold_secs: f64,

    #[serde(default = "default_persist_interval")]
    pub persist_interval_secs: u64,
}

/// What the title shows when the worker could not provide a count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackMode {
    #[default]
    Unavailable,
    LocalCount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default)]
    pub fallback: FallbackMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_share_base_url")]
    pub base_url: String,

    #[serde(default = "default_share_query_key")]
    pub query_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_state_path(&self) -> Result<PathBuf> {
        match &self.state_path {
            Some(path) => Ok(path.clone()),
            None => {
                let data_dir = dirs::data_dir().context("Failed to get data directory")?;
                Ok(data_dir.join(APP_DIR_NAME).join("state.json"))
            }
        }
    }
}

/// Which optional targets the player layout provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub year: bool,

    #[serde(default = "default_true")]
    pub map: bool,

    #[serde(default = "default_true")]
    pub status: bool,

    #[serde(default = "default_true")]
    pub voting: bool,
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config file found, using defaults");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;
        info!("Config loaded successfully");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join(APP_DIR_NAME).join("config.toml"))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            view_threshold_secs: default_view_threshold(),
            persist_interval_secs: default_persist_interval(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_share_base_url(),
            query_key: default_share_query_key(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            year: true,
            map: true,
            status: true,
            voting: true,
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_view_threshold() -> f64 { VIEW_THRESHOLD_SECS }
fn default_persist_interval() -> u64 { PERSIST_INTERVAL_SECS }
fn default_share_base_url() -> String { DEFAULT_SHARE_BASE_URL.to_string() }
fn default_share_query_key() -> String { SHARE_QUERY_KEY.to_string() }
