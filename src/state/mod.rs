//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: where the current run is in its lifecycle
//! - `RunState`: ids and queries already persisted, carried across runs

mod phase;
mod run_state;

// Re-export main types
pub use phase::CrawlPhase;
pub use run_state::RunState;
