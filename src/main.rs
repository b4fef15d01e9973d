//! Vidscout main entry point
//!
//! This is the command-line interface for the Vidscout video catalog crawler.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vidscout::config::{load_config_with_hash, Config};
use vidscout::credentials::Credential;
use vidscout::output::{load_statistics, print_report, print_statistics};
use vidscout::pipeline::run_crawl;
use vidscout::progress::ProgressStore;

/// Exit code used when every API credential ran out of quota
const EXIT_CREDENTIALS_EXHAUSTED: i32 = 2;

/// Vidscout: a resumable video catalog crawler
///
/// Vidscout searches a video API for each configured query under several
/// sort orders, enriches every new video with its metadata and channel
/// follower count, and appends the results to a semicolon-delimited dataset.
/// Interrupted runs resume from the first unfinished query.
#[derive(Parser, Debug)]
#[command(name = "vidscout")]
#[command(version)]
#[command(about = "A resumable video catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "vidscout.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without calling the API
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the dataset and journal and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vidscout=info,warn"),
            1 => EnvFilter::new("vidscout=debug,info"),
            2 => EnvFilter::new("vidscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Vidscout Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Batch size: {}", config.api.batch_size);
    println!("  Search page size: {}", config.api.search_page_size);
    println!("  Content type: {}", config.api.content_type);
    println!("  Request timeout: {}s", config.api.request_timeout_secs);

    println!("\nCredentials ({}):", config.api.credentials.len());
    for (index, token) in config.api.credentials.iter().enumerate() {
        println!("  {}. {}", index + 1, Credential::new(token.as_str()));
    }

    println!("\nCrawl:");
    let strategies: Vec<&str> = config
        .crawl
        .sort_strategies
        .iter()
        .map(|s| s.as_str())
        .collect();
    println!("  Sort strategies: {}", strategies.join(", "));
    println!(
        "  Short-form threshold: {}s",
        config.crawl.short_form_threshold_secs
    );
    println!(
        "  Synthetic title prefixes: {:?}",
        config.crawl.synthetic_title_prefixes
    );

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.dataset_path);
    println!("  Journal: {}", config.output.journal_path);

    println!("\nQueries ({}):", config.crawl.queries.len());
    for query in &config.crawl.queries {
        println!("  - {}", query);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would issue up to {} searches",
        config.crawl.queries.len() * config.crawl.sort_strategies.len()
    );
}

/// Handles the --stats mode: shows statistics from the dataset and journal
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Dataset: {}", config.output.dataset_path);
    println!("Journal: {}\n", config.output.journal_path);

    let store = ProgressStore::open(&config.output)?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Queries: {}, sort strategies: {}, credentials: {}",
        config.crawl.queries.len(),
        config.crawl.sort_strategies.len(),
        config.api.credentials.len()
    );

    let report = match run_crawl(config, config_hash).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    if report.is_exhausted() {
        std::process::exit(EXIT_CREDENTIALS_EXHAUSTED);
    }

    tracing::info!("Crawl completed successfully");
    Ok(())
}
