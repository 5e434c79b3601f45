use anyhow::Result;
use async_trait::async_trait;

use crate::models::LaunchRecord;

/// Anything that can produce the full, current launch list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LaunchSource: Send + Sync {
    async fn fetch_launches(&self) -> Result<Vec<LaunchRecord>>;
}
