//! Application context for the Carlog CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use once_cell::unsync::OnceCell;

use carlog_core::storage::DEFAULT_CAPACITY_BYTES;
use carlog_core::{AlertThresholds, FileStore, Garage};

use crate::cli::Cli;
use crate::config::{read_config, CarlogConfig};
use crate::constants::env;
use crate::ui::UiContext;

use super::resolver::{resolve_config_path, resolve_store_path};

/// Application context that bundles CLI args with configuration.
///
/// A missing config file is not an error: every setting has a default.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<CarlogConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the config file contents, loading them lazily if needed.
    pub fn config(&self) -> anyhow::Result<Option<&CarlogConfig>> {
        let config = self.config.get_or_try_init(|| -> anyhow::Result<_> {
            let path = resolve_config_path()?;
            if !path.exists() {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(None);
            }
            read_config(&path).map(Some)
        })?;
        Ok(config.as_ref())
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    /// Open the garage over the resolved store file.
    ///
    /// A store that does not exist yet opens empty and is created on the
    /// first write.
    pub fn open_garage(&self) -> anyhow::Result<Garage<FileStore>> {
        let path = self.store_path()?;
        let capacity = self
            .config()?
            .map(|config| config.store.capacity_bytes)
            .unwrap_or(DEFAULT_CAPACITY_BYTES);
        let store = FileStore::open_with_capacity(&path, capacity)?;
        Ok(Garage::new(store))
    }

    pub fn thresholds(&self) -> anyhow::Result<AlertThresholds> {
        Ok(self
            .config()?
            .map(|config| config.alerts.thresholds())
            .unwrap_or_default())
    }

    /// Display timezone from the config. An unknown name falls back to UTC.
    pub fn timezone(&self) -> Option<Tz> {
        let name = self.config().ok()??.ui.timezone.as_deref()?;
        match name.parse::<Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!(timezone = name, "unknown timezone in config, using UTC");
                None
            }
        }
    }

    /// The current instant, or the one pinned by `CARLOG_NOW`.
    pub fn now(&self) -> anyhow::Result<DateTime<Utc>> {
        match std::env::var(env::NOW) {
            Ok(value) if !value.trim().is_empty() => {
                let parsed = DateTime::parse_from_rfc3339(value.trim()).map_err(|_| {
                    anyhow::anyhow!("Invalid {} (expected RFC 3339): {}", env::NOW, value)
                })?;
                Ok(parsed.with_timezone(&Utc))
            }
            _ => Ok(Utc::now()),
        }
    }

    /// Build a UI context honouring the global `--no-color` and `--ascii` flags.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }
}
