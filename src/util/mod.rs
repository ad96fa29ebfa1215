//! Shared utilities

pub mod config;
pub mod fs;
pub mod hash;

pub use config::ScenarioConfig;
