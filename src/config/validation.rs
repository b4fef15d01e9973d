use crate::config::types::{ApiConfig, Config, CrawlConfig, OutputConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Largest id batch / page size the video API accepts
const MAX_BATCH_SIZE: usize = 50;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API access configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.credentials.is_empty() {
        return Err(ConfigError::Validation(
            "at least one API credential is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, credential) in config.credentials.iter().enumerate() {
        if credential.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "credential #{} is empty",
                index + 1
            )));
        }
        // The key is sent verbatim; a stray space would be rejected upstream
        if credential.trim() != credential {
            return Err(ConfigError::Validation(format!(
                "credential #{} has leading or trailing whitespace",
                index + 1
            )));
        }
        if !seen.insert(credential.as_str()) {
            return Err(ConfigError::Validation(format!(
                "credential #{} is listed more than once",
                index + 1
            )));
        }
    }

    validate_batch_size("batch-size", config.batch_size)?;
    validate_batch_size("search-page-size", config.search_page_size)?;

    if config.content_type.is_empty() {
        return Err(ConfigError::Validation(
            "content-type cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_batch_size(name: &str, value: usize) -> Result<(), ConfigError> {
    if value < 1 || value > MAX_BATCH_SIZE {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_BATCH_SIZE, value
        )));
    }
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.queries.is_empty() {
        return Err(ConfigError::Validation(
            "at least one query is required".to_string(),
        ));
    }

    if config.queries.iter().any(|q| q.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "queries cannot contain empty strings".to_string(),
        ));
    }

    if config.sort_strategies.is_empty() {
        return Err(ConfigError::Validation(
            "at least one sort strategy is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for strategy in &config.sort_strategies {
        if !seen.insert(*strategy) {
            return Err(ConfigError::Validation(format!(
                "sort strategy '{}' is listed more than once",
                strategy
            )));
        }
    }

    if config
        .synthetic_title_prefixes
        .iter()
        .any(|p| p.is_empty())
    {
        // An empty prefix would match every title
        return Err(ConfigError::Validation(
            "synthetic-title-prefixes cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dataset_path.is_empty() {
        return Err(ConfigError::Validation(
            "dataset-path cannot be empty".to_string(),
        ));
    }

    if config.journal_path.is_empty() {
        return Err(ConfigError::Validation(
            "journal-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
