//! Vidscout: a resumable video catalog crawler
//!
//! This crate collects a deduplicated catalog of video metadata from a
//! quota-metered search API. It rotates through a list of API credentials as
//! quotas run out, expands each search query over several sort orders, enriches
//! the hits in batches and appends the rows to a semicolon-delimited dataset so
//! an interrupted crawl can pick up where it stopped.

pub mod api;
pub mod config;
pub mod credentials;
pub mod duration;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod state;

use thiserror::Error;

/// Main error type for Vidscout operations
#[derive(Debug, Error)]
pub enum VidscoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Dataset error: {0}")]
    Dataset(#[from] progress::DatasetError),

    #[error("Journal error: {0}")]
    Journal(#[from] progress::JournalError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Vidscout operations
pub type Result<T> = std::result::Result<T, VidscoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{CrawlOrchestrator, CrawlOutcome, CrawlReport};
pub use state::{CrawlPhase, RunState};
