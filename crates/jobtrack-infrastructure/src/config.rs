//! Application configuration.
//!
//! Loaded from `~/.config/jobtrack/config.toml`. Every field has a default, so
//! a missing file yields an offline-only configuration. Environment variables
//! override the file:
//!
//! - `JOBTRACK_REMOTE_URL` / `JOBTRACK_ANON_KEY`: remote project endpoint and
//!   public key
//! - `JOBTRACK_DATA_DIR`: where the local fallback store lives
//!
//! ```toml
//! [remote]
//! url = "https://xyzcompany.supabase.co"
//! anon_key = "eyJhbGciOi..."
//! request_timeout_secs = 15
//!
//! [sync]
//! auth_timeout_ms = 5000
//! load_timeout_ms = 10000
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jobtrack_core::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};

use crate::paths::TrackerPaths;

pub const ENV_REMOTE_URL: &str = "JOBTRACK_REMOTE_URL";
pub const ENV_ANON_KEY: &str = "JOBTRACK_ANON_KEY";
pub const ENV_DATA_DIR: &str = "JOBTRACK_DATA_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

/// Remote project settings. Without both `url` and `anon_key` the tracker
/// runs in local-only mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            request_timeout_secs: 15,
        }
    }
}

impl RemoteConfig {
    /// Returns `(url, anon_key)` when the remote is fully configured.
    pub fn endpoint(&self) -> Option<(&str, &str)> {
        match (self.url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Some((url.trim_end_matches('/'), key))
            }
            _ => None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Startup time budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Budget for resolving the current session at startup.
    pub auth_timeout_ms: u64,
    /// Budget for the initial remote fetch.
    pub load_timeout_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auth_timeout_ms: 5_000,
            load_timeout_ms: 10_000,
        }
    }
}

impl SyncConfig {
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl TrackerConfig {
    /// Loads the config file from the default location and applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = TrackerPaths::config_file().map_err(|e| TrackerError::config(e.to_string()))?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Loads a config file. A missing or empty file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("[Config] No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: TrackerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_REMOTE_URL) {
            self.remote.url = Some(url);
        }
        if let Some(key) = lookup(ENV_ANON_KEY) {
            self.remote.anon_key = Some(key);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Resolves the data directory: the configured one, else the platform
    /// default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => TrackerPaths::data_dir().map_err(|e| TrackerError::config(e.to_string())),
        }
    }
}
