//! Progress persistence
//!
//! This module keeps crawl results and resume information on disk:
//! - The semicolon-delimited dataset (append-only)
//! - The SQLite run journal (runs and completed queries)
//! - Rebuilding `RunState` from both at startup

mod dataset;
mod journal;
mod schema;

pub use dataset::{Dataset, DatasetError, DatasetRow, DatasetSnapshot, COLUMNS};
pub use journal::{JournalError, JournalResult, RunRecord, RunStatus, SqliteJournal};

use crate::config::OutputConfig;
use crate::state::RunState;
use crate::VidscoutError;
use std::path::Path;

/// Dataset plus journal, written in that order for every query
pub struct ProgressStore {
    dataset: Dataset,
    journal: SqliteJournal,
}

impl ProgressStore {
    pub fn new(dataset: Dataset, journal: SqliteJournal) -> Self {
        Self { dataset, journal }
    }

    /// Opens the dataset and journal named in the output configuration
    pub fn open(output: &OutputConfig) -> Result<Self, VidscoutError> {
        let dataset = Dataset::new(&output.dataset_path);
        let journal = SqliteJournal::open(Path::new(&output.journal_path))?;
        Ok(Self::new(dataset, journal))
    }

    /// Rebuilds run state from earlier runs
    ///
    /// Every video id in the dataset is known. Once the journal has recorded a
    /// run, only the queries it marked complete are complete: rows of a query
    /// cut short by a crash stay in the dataset, and the query is fetched again
    /// for its missing rows. A dataset with an empty journal (written before
    /// the journal existed) counts each query it holds as complete. If the
    /// dataset cannot be read the whole state is treated as empty and the run
    /// proceeds as a first run.
    pub fn load(&self) -> Result<RunState, JournalError> {
        let snapshot = match self.dataset.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    "Existing dataset {} is unreadable ({}); starting from empty state",
                    self.dataset.path().display(),
                    e
                );
                return Ok(RunState::new());
            }
        };

        if snapshot.skipped_records > 0 {
            tracing::warn!(
                "Skipped {} unreadable records in {}",
                snapshot.skipped_records,
                self.dataset.path().display()
            );
        }

        let journalled = self.journal.completed_queries()?;
        let completed = if self.journal.has_runs()? {
            let unfinished = snapshot
                .queries
                .iter()
                .filter(|q| !journalled.contains(q.as_str()))
                .count();
            if unfinished > 0 {
                tracing::warn!(
                    "{} queries have rows in the dataset but never completed; they will be resumed",
                    unfinished
                );
            }
            journalled
        } else {
            let mut completed = snapshot.queries;
            completed.extend(journalled);
            completed
        };

        tracing::info!(
            "Loaded {} videos ({} rows) and {} completed queries",
            snapshot.video_ids.len(),
            snapshot.rows,
            completed.len()
        );

        Ok(RunState::from_parts(snapshot.video_ids, completed))
    }

    /// Appends a query's rows, then marks the query complete
    ///
    /// If the append fails the query is not marked, so it is retried on the
    /// next run.
    pub fn commit_query(
        &mut self,
        run_id: i64,
        query: &str,
        rows: &[DatasetRow],
    ) -> Result<usize, VidscoutError> {
        let written = self.dataset.append(rows)?;
        self.journal.mark_query_complete(run_id, query, written)?;
        Ok(written)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn journal(&self) -> &SqliteJournal {
        &self.journal
    }

    pub fn journal_mut(&mut self) -> &mut SqliteJournal {
        &mut self.journal
    }
}
