//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::api::LaunchSource;
use crate::models::LaunchRecord;

pub fn falcon_1() -> LaunchRecord {
    LaunchRecord::new("1", "Falcon 1", "2006", Some(false), None)
}

pub fn sample_launches() -> Vec<LaunchRecord> {
    vec![
        falcon_1(),
        LaunchRecord::new("2", "DemoSat", "2007", Some(false), Some("Stage 2 roll oscillation".to_string())),
        LaunchRecord::new("4", "RatSat", "2008", Some(true), None),
    ]
}

/// Source that suspends before answering, so callers can overlap.
pub struct SlowSource {
    launches: Vec<LaunchRecord>,
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowSource {
    pub fn new(launches: Vec<LaunchRecord>, delay: Duration) -> Self {
        Self {
            launches,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LaunchSource for SlowSource {
    async fn fetch_launches(&self) -> Result<Vec<LaunchRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.launches.clone())
    }
}
