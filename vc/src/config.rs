//! viewcoord configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::ViewId;

/// Main coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enables diagnostic logging of configuration defects
    pub debug: bool,

    /// Key that applies filters when pressed inside a filter input
    #[serde(rename = "apply-key")]
    pub apply_key: String,

    /// Broadcast channel capacity
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,

    /// Periodic refresh settings
    #[serde(rename = "auto-refresh")]
    pub auto_refresh: AutoRefreshConfig,

    /// Log level override (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            apply_key: "Enter".to_string(),
            channel_capacity: crate::events::DEFAULT_CHANNEL_CAPACITY,
            auto_refresh: AutoRefreshConfig::default(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must load. Otherwise the first readable file among
    /// `./.viewcoord.yml` and `<config dir>/viewcoord/viewcoord.yml` wins;
    /// a broken candidate is logged and skipped. With no file, defaults apply.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidates() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %candidate.display(), error = %e, "Config::load: skipping unreadable config"),
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Implicit config locations, highest priority first
    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".viewcoord.yml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("viewcoord").join("viewcoord.yml"));
        }
        paths
    }

    /// Effective log level: explicit setting, else DEBUG when `debug` is on
    pub fn effective_log_level(&self) -> Option<String> {
        match (&self.log_level, self.debug) {
            (Some(level), _) => Some(level.clone()),
            (None, true) => Some("DEBUG".to_string()),
            (None, false) => None,
        }
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!(path = %path.display(), "Config::load: loaded");
        Ok(config)
    }
}

/// Periodic refresh configuration
///
/// The coordinator itself never schedules refreshes; an external timer
/// (see [`crate::auto_refresh`]) sends refresh-requested signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoRefreshConfig {
    pub enabled: bool,

    /// Interval between refresh requests in milliseconds
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Views to refresh on each tick
    pub views: Vec<ViewId>,
}

impl Default for AutoRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 30_000,
            views: Vec::new(),
        }
    }
}

impl AutoRefreshConfig {
    /// Get the interval as a Duration
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}
