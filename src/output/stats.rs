//! Statistics generation from the dataset and run journal
//!
//! This module provides functionality for summarizing what earlier crawl runs
//! collected, for the `--stats` command.

use crate::progress::{ProgressStore, RunRecord};
use crate::VidscoutError;
use std::collections::{HashMap, HashSet};

/// Number of runs listed in the report
pub const RECENT_RUN_LIMIT: usize = 5;

/// Number of languages listed in the report
pub const TOP_LANGUAGE_LIMIT: usize = 10;

/// Dataset statistics summary
#[derive(Debug, Clone, Default)]
pub struct DatasetStatistics {
    /// Total number of data rows
    pub total_rows: u64,

    /// Number of distinct video ids
    pub unique_videos: u64,

    /// Number of distinct queries with at least one row
    pub queries_with_rows: u64,

    /// Completed queries that produced no rows
    pub empty_queries: u64,

    /// Rows flagged as short-form
    pub short_form_rows: u64,

    /// Rows by the sort strategy that found them
    pub rows_by_strategy: HashMap<String, u64>,

    /// Most common languages, most frequent first
    pub top_languages: Vec<(String, u64)>,

    /// Latest runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from the progress store
pub fn load_statistics(store: &ProgressStore) -> Result<DatasetStatistics, VidscoutError> {
    let rows = store.dataset().read_rows()?;

    let mut videos = HashSet::new();
    let mut queries = HashSet::new();
    let mut rows_by_strategy: HashMap<String, u64> = HashMap::new();
    let mut languages: HashMap<String, u64> = HashMap::new();
    let mut short_form_rows = 0;

    for row in &rows {
        videos.insert(row.video_id.as_str());
        queries.insert(row.query_used.as_str());
        *rows_by_strategy.entry(row.search_type.clone()).or_default() += 1;
        *languages.entry(row.default_language.clone()).or_default() += 1;
        if row.is_shorts == 1 {
            short_form_rows += 1;
        }
    }

    let mut top_languages: Vec<(String, u64)> = languages.into_iter().collect();
    top_languages.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_languages.truncate(TOP_LANGUAGE_LIMIT);

    Ok(DatasetStatistics {
        total_rows: rows.len() as u64,
        unique_videos: videos.len() as u64,
        queries_with_rows: queries.len() as u64,
        empty_queries: store.journal().count_empty_queries()?,
        short_form_rows,
        rows_by_strategy,
        top_languages,
        recent_runs: store.journal().recent_runs(RECENT_RUN_LIMIT)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Overview:");
    println!("  Total rows: {}", stats.total_rows);
    println!("  Unique videos: {}", stats.unique_videos);
    println!("  Queries with rows: {}", stats.queries_with_rows);
    println!("  Queries with no new videos: {}", stats.empty_queries);
    println!(
        "  Short-form videos: {} ({:.1}%)",
        stats.short_form_rows,
        percentage(stats.short_form_rows, stats.total_rows)
    );
    println!();

    if !stats.rows_by_strategy.is_empty() {
        println!("Rows by Sort Strategy:");
        let mut strategy_counts: Vec<_> = stats.rows_by_strategy.iter().collect();
        strategy_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (strategy, count) in strategy_counts {
            println!(
                "  {}: {} ({:.1}%)",
                strategy,
                count,
                percentage(*count, stats.total_rows)
            );
        }
        println!();
    }

    if !stats.top_languages.is_empty() {
        println!("Top Languages:");
        for (language, count) in &stats.top_languages {
            println!("  {}: {}", language, count);
        }
        println!();
    }

    if !stats.recent_runs.is_empty() {
        println!("Recent Runs:");
        for run in &stats.recent_runs {
            println!(
                "  #{} {} started {} ({} queries, {} rows)",
                run.id,
                run.status.to_db_string(),
                run.started_at,
                run.queries_completed,
                run.rows_written
            );
        }
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
