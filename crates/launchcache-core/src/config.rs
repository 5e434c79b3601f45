//! Application configuration management.
//!
//! This module handles loading the application configuration, which holds
//! the API base URL, the cache database location and the request timeout.
//!
//! Configuration is stored at `~/.config/launchcache/config.json`; every
//! field is optional and environment variables override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_API_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::api::ApiClient;
use crate::cache::LaunchDatabase;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "launchcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Cache database file name
const DATABASE_FILE: &str = "launches.db";

/// Overrides `api_base_url`
pub const API_URL_ENV: &str = "LAUNCHCACHE_API_URL";

/// Overrides `database_path`
pub const DATABASE_ENV: &str = "LAUNCHCACHE_DB";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub database_path: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Apply `LAUNCHCACHE_API_URL` / `LAUNCHCACHE_DB` from the environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATABASE_ENV).ok().map(PathBuf::from),
        );
    }

    /// Replace fields with the given values where present and non-empty
    pub fn apply_overrides(&mut self, api_base_url: Option<String>, database_path: Option<PathBuf>) {
        if let Some(url) = api_base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        if let Some(path) = database_path.filter(|p| !p.as_os_str().is_empty()) {
            self.database_path = Some(path);
        }
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join(DATABASE_FILE))
    }

    pub fn build_client(&self) -> Result<ApiClient> {
        ApiClient::with_options(self.api_base_url(), self.request_timeout())
    }

    pub fn open_database(&self) -> Result<LaunchDatabase> {
        LaunchDatabase::open(self.database_path()?)
    }
}
