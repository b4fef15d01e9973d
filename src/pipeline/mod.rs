//! Crawl pipeline
//!
//! Each query flows through three stages before it is persisted:
//! search expansion over every sort order, batched detail enrichment and
//! batched channel enrichment. [`CrawlOrchestrator`] drives the stages and
//! the run's phase machine.

mod channels;
mod details;
mod orchestrator;
mod record;
mod search;

pub use channels::{ChannelEnricher, ChannelMetrics};
pub use details::{DetailBatch, DetailEnricher, UNKNOWN_LANGUAGE};
pub use orchestrator::{CrawlOrchestrator, CrawlOutcome, CrawlReport};
pub use record::{CandidateId, VideoRecord, WATCH_URL_PREFIX};
pub use search::SearchExpander;

use crate::config::Config;
use crate::VidscoutError;

/// Runs a full crawl against the configured API and progress files
///
/// # Example
///
/// ```no_run
/// use vidscout::config::load_config_with_hash;
/// use vidscout::pipeline::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("vidscout.toml"))?;
/// let report = run_crawl(&config, &hash).await?;
/// println!("{} rows written", report.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, config_hash: &str) -> Result<CrawlReport, VidscoutError> {
    let mut orchestrator = CrawlOrchestrator::from_config(config, config_hash)?;
    orchestrator.run().await
}
