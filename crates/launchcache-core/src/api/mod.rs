//! REST API client module for the SpaceX launches service.
//!
//! This module provides the `ApiClient` for fetching the launch list and
//! the `LaunchSource` trait the retrieval service consumes it through.
//!
//! The API is public: no authentication, no pagination.

pub mod client;
pub mod error;
pub mod source;

pub use client::ApiClient;
pub use error::ApiError;
pub use source::LaunchSource;

#[cfg(test)]
pub use source::MockLaunchSource;
