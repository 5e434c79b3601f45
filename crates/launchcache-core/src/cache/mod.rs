//! Local caching module for offline data access.
//!
//! This module provides the `LaunchDatabase`, a SQLite-backed store that
//! holds the launch list from the most recent successful fetch, and
//! `CacheAge` for describing how old that snapshot is.
//!
//! The cache never expires on its own; it is replaced wholesale on reload.

pub mod age;
pub mod database;
mod schema;

pub use age::CacheAge;
pub use database::LaunchDatabase;
