use std::path::{Path, PathBuf};

use carlog_core::storage::DEFAULT_CAPACITY_BYTES;
use carlog_core::AlertThresholds;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOG_LEVEL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarlogConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub alerts: AlertsSection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
    #[serde(default = "default_capacity")]
    pub capacity_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsSection {
    pub mileage_window_km: u32,
    pub days_window: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    pub level: String,
}

impl Default for AlertsSection {
    fn default() -> Self {
        let defaults = AlertThresholds::default();
        Self {
            mileage_window_km: defaults.mileage_window_km,
            days_window: defaults.days_window,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AlertsSection {
    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            mileage_window_km: self.mileage_window_km,
            days_window: self.days_window,
        }
    }
}

impl CarlogConfig {
    pub fn new(store_path: PathBuf, timezone: Option<String>) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
                capacity_bytes: DEFAULT_CAPACITY_BYTES,
            },
            alerts: AlertsSection::default(),
            ui: UiSection { timezone },
            log: LogSection::default(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY_BYTES
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("store.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<CarlogConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &CarlogConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("carlog"));
        }
    }
    Ok(home_dir()?.join(".config").join("carlog"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("carlog"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("carlog"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
