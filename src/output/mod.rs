//! Output module for reporting on collected data
//!
//! This module handles:
//! - Summarizing the dataset and run journal for `--stats`
//! - Printing the report of a finished crawl run

pub mod stats;

pub use stats::{load_statistics, print_statistics, DatasetStatistics};

use crate::pipeline::{CrawlOutcome, CrawlReport};

/// Prints the end-of-run summary to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Run {} ===\n", report.run_id);

    match &report.outcome {
        CrawlOutcome::Completed => println!("Outcome: completed"),
        CrawlOutcome::CredentialsExhausted { query } => {
            println!("Outcome: credentials exhausted during '{}'", query);
            println!("  Rerun with fresh credentials to resume from this query.");
        }
    }

    println!("  Queries configured: {}", report.queries_total);
    println!("  Queries processed: {}", report.queries_processed);
    println!("  Queries skipped (done earlier): {}", report.queries_skipped);
    println!("  Rows written: {}", report.rows_written);
    println!("  API calls: {}", report.api_calls);
    println!("  Credential rotations: {}", report.rotations);
}
