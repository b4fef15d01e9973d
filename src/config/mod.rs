//! Configuration module for Vidscout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting except the credential list has a built-in default, so a file
//! holding only `[api] credentials = [...]` is a complete configuration.
//!
//! # Example
//!
//! ```no_run
//! use vidscout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("vidscout.toml")).unwrap();
//! println!("Crawling {} queries", config.crawl.queries.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ApiConfig, Config, CrawlConfig, OutputConfig, SortStrategy, DEFAULT_QUERIES};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
