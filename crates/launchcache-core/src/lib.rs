//! launchcache core - SpaceX launch list with a cache-first SQLite store.
//!
//! - `api`: HTTP client for the launches endpoint
//! - `cache`: SQLite store holding the last successful fetch
//! - `retrieval`: cache-first / forced-reload orchestration
//! - `presentation`: observable presentation state and its retrieval task
//! - `config`: user configuration and environment overrides

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod presentation;
pub mod retrieval;
pub mod utils;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, LaunchSource};
pub use cache::{CacheAge, LaunchDatabase};
pub use config::Config;
pub use models::LaunchRecord;
pub use presentation::{LaunchFeed, PresentationState};
pub use retrieval::{LoadError, RetrievalService};
