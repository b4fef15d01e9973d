//! Crawl orchestration
//!
//! This module contains the main crawl loop that:
//! - Rebuilds run state from the dataset and journal
//! - Skips queries finished by earlier runs
//! - Runs search, detail and channel enrichment per query
//! - Persists each query's rows before moving on
//! - Stops the whole run once every credential is used up

use crate::api::{ApiConnector, HttpConnector};
use crate::config::Config;
use crate::credentials::{CredentialRotor, CredentialsExhausted, ResilientInvoker};
use crate::pipeline::channels::ChannelEnricher;
use crate::pipeline::details::DetailEnricher;
use crate::pipeline::search::SearchExpander;
use crate::progress::{DatasetRow, ProgressStore, RunStatus};
use crate::state::{CrawlPhase, RunState};
use crate::VidscoutError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// How a crawl run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every configured query has been processed
    Completed,
    /// Credentials ran out while `query` was in flight; it was not persisted
    CredentialsExhausted { query: String },
}

/// Summary of one crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub run_id: i64,
    pub outcome: CrawlOutcome,
    /// Distinct configured queries
    pub queries_total: usize,
    /// Queries finished and persisted in this run
    pub queries_processed: usize,
    /// Queries already finished by earlier runs
    pub queries_skipped: usize,
    pub rows_written: usize,
    pub api_calls: u64,
    pub rotations: u64,
}

impl CrawlReport {
    pub fn is_exhausted(&self) -> bool {
        matches!(self.outcome, CrawlOutcome::CredentialsExhausted { .. })
    }
}

/// Main crawl orchestrator
pub struct CrawlOrchestrator {
    queries: Vec<String>,
    expander: SearchExpander,
    details: DetailEnricher,
    channels: ChannelEnricher,
    invoker: ResilientInvoker,
    store: ProgressStore,
    phase: CrawlPhase,
    config_hash: String,
}

impl CrawlOrchestrator {
    /// Creates an orchestrator that connects through `connector`
    pub fn new(
        config: &Config,
        connector: Arc<dyn ApiConnector>,
        store: ProgressStore,
        config_hash: impl Into<String>,
    ) -> Self {
        let rotor = CredentialRotor::from_tokens(config.api.credentials.iter().cloned(), connector);

        Self {
            queries: config.crawl.queries.clone(),
            expander: SearchExpander::from_config(config),
            details: DetailEnricher::from_config(config),
            channels: ChannelEnricher::from_config(config),
            invoker: ResilientInvoker::new(rotor),
            store,
            phase: CrawlPhase::Idle,
            config_hash: config_hash.into(),
        }
    }

    /// Creates an orchestrator backed by the HTTP API and on-disk progress files
    pub fn from_config(config: &Config, config_hash: impl Into<String>) -> Result<Self, VidscoutError> {
        let connector = HttpConnector::from_config(&config.api)?;
        let store = ProgressStore::open(&config.output)?;
        Ok(Self::new(config, Arc::new(connector), store, config_hash))
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn invoker(&self) -> &ResilientInvoker {
        &self.invoker
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), VidscoutError> {
        if !self.phase.can_transition_to(next) {
            return Err(VidscoutError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs the crawl until every query is done or credentials run out
    ///
    /// Running out of credentials is reported through the returned
    /// [`CrawlReport`]; only storage failures are errors.
    pub async fn run(&mut self) -> Result<CrawlReport, VidscoutError> {
        self.transition(CrawlPhase::LoadingState)?;

        let interrupted = self.store.journal_mut().mark_interrupted_runs()?;
        if interrupted > 0 {
            tracing::warn!("Marked {} unfinished earlier runs as interrupted", interrupted);
        }

        let mut state = self.store.load()?;
        let run_id = self.store.journal_mut().create_run(&self.config_hash)?;
        tracing::info!("Starting crawl run {}", run_id);

        let result = self.run_queries(run_id, &mut state).await;

        let status = match &result {
            Ok(report) if report.is_exhausted() => RunStatus::Exhausted,
            Ok(_) => RunStatus::Completed,
            Err(_) => RunStatus::Failed,
        };
        if let Err(e) = self.store.journal_mut().finish_run(run_id, status) {
            tracing::error!("Failed to close run {}: {}", run_id, e);
        }

        result
    }

    async fn run_queries(
        &mut self,
        run_id: i64,
        state: &mut RunState,
    ) -> Result<CrawlReport, VidscoutError> {
        let start_time = Instant::now();

        let mut distinct: HashSet<&str> = HashSet::new();
        let mut pending = Vec::new();
        let mut skipped = 0;
        for query in &self.queries {
            if !distinct.insert(query.as_str()) {
                continue;
            }
            if state.is_query_complete(query) {
                tracing::debug!("Skipping completed query '{}'", query);
                skipped += 1;
            } else {
                pending.push(query.clone());
            }
        }

        let mut report = CrawlReport {
            run_id,
            outcome: CrawlOutcome::Completed,
            queries_total: distinct.len(),
            queries_processed: 0,
            queries_skipped: skipped,
            rows_written: 0,
            api_calls: 0,
            rotations: 0,
        };

        tracing::info!(
            "{} queries configured, {} already done, {} to process",
            report.queries_total,
            skipped,
            pending.len()
        );

        let total = pending.len();
        for (index, query) in pending.into_iter().enumerate() {
            self.transition(CrawlPhase::PerQuery)?;
            tracing::info!("[{}/{}] Processing query '{}'", index + 1, total, query);

            let rows = match self.process_query(&query, state).await {
                Ok(rows) => rows,
                Err(CredentialsExhausted) => {
                    self.transition(CrawlPhase::FatalAbort)?;
                    tracing::error!(
                        "All credentials exhausted during '{}'; stopping. Rerun to resume.",
                        query
                    );
                    report.outcome = CrawlOutcome::CredentialsExhausted { query };
                    self.fill_counters(&mut report);
                    return Ok(report);
                }
            };

            self.transition(CrawlPhase::Persisting)?;
            let written = self.store.commit_query(run_id, &query, &rows)?;
            state.record_query(&query, rows.into_iter().map(|row| row.video_id));

            report.queries_processed += 1;
            report.rows_written += written;
            tracing::info!(
                "Saved {} rows for '{}' ({} known videos)",
                written,
                query,
                state.known_id_count()
            );
        }

        self.transition(CrawlPhase::Done)?;
        self.fill_counters(&mut report);
        tracing::info!(
            "Crawl completed: {} queries, {} rows in {:?}",
            report.queries_processed,
            report.rows_written,
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Search, detail and channel stages for one query
    ///
    /// Nothing is persisted here; the caller writes the returned rows.
    async fn process_query(
        &mut self,
        query: &str,
        state: &RunState,
    ) -> Result<Vec<DatasetRow>, CredentialsExhausted> {
        let candidates = self.expander.expand(&mut self.invoker, query, state).await?;
        if candidates.is_empty() {
            tracing::info!("No new videos for '{}'", query);
            return Ok(Vec::new());
        }
        tracing::info!("Found {} new videos for '{}'", candidates.len(), query);

        let batch = self.details.enrich(&mut self.invoker, query, &candidates).await?;
        if batch.failed_batches > 0 {
            tracing::warn!(
                "{} detail batches failed for '{}'",
                batch.failed_batches,
                query
            );
        }

        let metrics = self.channels.fetch(&mut self.invoker, &batch.channel_ids).await?;

        let rows = batch
            .records
            .into_iter()
            .filter(|record| !state.contains_id(&record.video_id))
            .map(|record| {
                let followers = record
                    .channel_id
                    .as_deref()
                    .map(|id| metrics.follower_count(id))
                    .unwrap_or(0);
                record.into_row(followers)
            })
            .collect();

        Ok(rows)
    }

    fn fill_counters(&self, report: &mut CrawlReport) {
        report.api_calls = self.invoker.attempts();
        report.rotations = self.invoker.rotations();
    }
}
