//! Data models for SpaceX launch data.
//!
//! - `LaunchRecord`: one launch as cached and displayed
//! - `ApiLaunch`: the v3 wire shape returned by the launches endpoint

pub mod launch;

pub use launch::{ApiLaunch, LaunchRecord};
