//! API client for the SpaceX REST API.
//!
//! This module provides the `ApiClient` struct, which issues the single
//! `GET /launches` request and converts the payload into `LaunchRecord`s.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, info};

use crate::models::{ApiLaunch, LaunchRecord};

use super::{ApiError, LaunchSource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the public SpaceX API
pub const DEFAULT_API_BASE_URL: &str = "https://api.spacexdata.com/v3";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the SpaceX launches endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the public API with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_API_BASE_URL, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a client for a custom base URL (mirrors, local fixtures)
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn launches_url(&self) -> String {
        format!("{}/launches", self.base_url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        response
            .text()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to read response body from {}", url))
    }

    /// Fetch the full launch list
    pub async fn fetch_launches(&self) -> Result<Vec<LaunchRecord>> {
        let url = self.launches_url();
        debug!(url = %url, "Fetching launches");

        let text = self.get_text(&url).await?;
        let launches = Self::parse_launches(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;
        info!(count = launches.len(), "Launches fetched");

        Ok(launches)
    }

    /// Parse a raw launches payload; the HTTP path goes through here too
    pub fn parse_launches(text: &str) -> Result<Vec<LaunchRecord>> {
        let launches: Vec<ApiLaunch> =
            serde_json::from_str(text).context("Failed to parse launches payload")?;
        Ok(launches.iter().map(ApiLaunch::to_record).collect())
    }
}

#[async_trait]
impl LaunchSource for ApiClient {
    async fn fetch_launches(&self) -> Result<Vec<LaunchRecord>> {
        ApiClient::fetch_launches(self).await
    }
}
