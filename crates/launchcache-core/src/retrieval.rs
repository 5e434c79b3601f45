//! Cache-first launch retrieval.
//!
//! `RetrievalService::retrieve` serves the cached list when there is one
//! and a reload was not requested; otherwise it fetches the full list and
//! replaces the cache with it. Every failure collapses into `LoadError`.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::LaunchSource;
use crate::cache::LaunchDatabase;
use crate::config::Config;
use crate::models::LaunchRecord;

/// The only failure a caller sees. `reason` is kept for logs and carries no kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load launches")]
pub struct LoadError {
    reason: String,
}

impl LoadError {
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<anyhow::Error> for LoadError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            reason: format!("{:#}", err),
        }
    }
}

pub struct RetrievalService {
    source: Arc<dyn LaunchSource>,
    store: LaunchDatabase,
    /// Sequences whole retrievals so fetch + replace never interleave
    gate: Mutex<()>,
}

impl RetrievalService {
    pub fn new(source: Arc<dyn LaunchSource>, store: LaunchDatabase) -> Self {
        Self {
            source,
            store,
            gate: Mutex::new(()),
        }
    }

    /// Build the service from configuration: HTTP client plus on-disk cache
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = config.build_client()?;
        let store = config.open_database()?;
        Ok(Self::new(Arc::new(client), store))
    }

    /// Return cached launches, or fetch and cache them when the cache is
    /// empty or `force_reload` is set.
    pub async fn retrieve(&self, force_reload: bool) -> Result<Vec<LaunchRecord>, LoadError> {
        let _guard = self.gate.lock().await;

        self.load(force_reload).await.map_err(|e| {
            warn!(error = %format!("{:#}", e), force_reload, "Failed to load launches");
            LoadError::from(e)
        })
    }

    async fn load(&self, force_reload: bool) -> Result<Vec<LaunchRecord>> {
        let cached = self.store.get_all_launches()?;
        if !cached.is_empty() && !force_reload {
            debug!(count = cached.len(), "Serving launches from cache");
            return Ok(cached);
        }

        info!(force_reload, cached = cached.len(), "Fetching launches from API");
        let launches = self.source.fetch_launches().await?;
        if let Some(id) = first_duplicate_id(&launches) {
            anyhow::bail!("Launch payload repeats id {}", id);
        }

        self.store.replace_launches(&launches)?;
        info!(count = launches.len(), "Launch cache updated");

        Ok(launches)
    }

    /// Whatever is cached right now, without touching the network
    pub fn cached(&self) -> Result<Vec<LaunchRecord>> {
        self.store.get_all_launches()
    }

    pub async fn clear_cache(&self) -> Result<usize> {
        let _guard = self.gate.lock().await;
        self.store.clear_launches()
    }

    pub fn last_refreshed(&self) -> Result<Option<DateTime<Utc>>> {
        self.store.last_refreshed()
    }

    pub fn store(&self) -> &LaunchDatabase {
        &self.store
    }
}

/// The cache is keyed by id, so a payload that repeats one cannot be stored verbatim
fn first_duplicate_id(launches: &[LaunchRecord]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(launches.len());
    launches
        .iter()
        .map(|l| l.id.as_str())
        .find(|id| !seen.insert(*id))
}
