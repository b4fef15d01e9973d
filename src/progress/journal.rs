//! SQLite run journal
//!
//! Records every run and every completed query. The dataset alone cannot
//! remember a query that produced zero rows; the journal can.

use crate::progress::schema::initialize_schema;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during journal operations
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for journal operations
pub type JournalResult<T> = Result<T, JournalError>;

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub queries_completed: u64,
    pub rows_written: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Exhausted,
    Interrupted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Exhausted => "exhausted",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "exhausted" => Some(Self::Exhausted),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// SQLite journal backend
pub struct SqliteJournal {
    conn: Connection,
}

impl SqliteJournal {
    /// Opens or creates the journal at `path`
    pub fn open(path: &Path) -> JournalResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = FULL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory journal (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> JournalResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===== Run Management =====

    /// Creates a new run in `running` state and returns its id
    pub fn create_run(&mut self, config_hash: &str) -> JournalResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Closes a run with a final status and finish timestamp
    pub fn finish_run(&mut self, run_id: i64, status: RunStatus) -> JournalResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(JournalError::RunNotFound(run_id));
        }
        Ok(())
    }

    /// Marks runs still flagged `running` as interrupted
    ///
    /// Such runs were killed before they could close themselves.
    pub fn mark_interrupted_runs(&mut self) -> JournalResult<usize> {
        let count = self.conn.execute(
            "UPDATE runs SET status = ?1 WHERE status = ?2",
            params![
                RunStatus::Interrupted.to_db_string(),
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(count)
    }

    pub fn get_run(&self, run_id: i64) -> JournalResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status, queries_completed, rows_written
                 FROM runs WHERE id = ?1",
                params![run_id],
                map_run,
            )
            .optional()?
            .ok_or(JournalError::RunNotFound(run_id))
    }

    /// Whether any run, finished or not, was ever recorded
    pub fn has_runs(&self) -> JournalResult<bool> {
        let exists: bool = self
            .conn
            .query_row("SELECT EXISTS(SELECT 1 FROM runs)", [], |row| row.get(0))?;
        Ok(exists)
    }

    /// Most recent runs, newest first
    pub fn recent_runs(&self, limit: usize) -> JournalResult<Vec<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status, queries_completed, rows_written
             FROM runs ORDER BY id DESC LIMIT ?1",
        )?;
        let runs = stmt
            .query_map(params![limit as i64], map_run)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    // ===== Query Completion =====

    /// Records that a query's rows are fully appended
    ///
    /// The run counters are updated in the same transaction.
    pub fn mark_query_complete(
        &mut self,
        run_id: i64,
        query: &str,
        rows_appended: usize,
    ) -> JournalResult<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO completed_queries (query, run_id, rows_appended, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![query, run_id, rows_appended as i64, now],
        )?;
        if inserted > 0 {
            tx.execute(
                "UPDATE runs SET queries_completed = queries_completed + 1,
                                 rows_written = rows_written + ?1
                 WHERE id = ?2",
                params![rows_appended as i64, run_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// All queries completed in any run
    pub fn completed_queries(&self) -> JournalResult<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT query FROM completed_queries")?;
        let queries = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(queries)
    }

    /// Number of completed queries that appended no rows
    pub fn count_empty_queries(&self) -> JournalResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM completed_queries WHERE rows_appended = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
        queries_completed: row.get::<_, i64>(5)? as u64,
        rows_written: row.get::<_, i64>(6)? as u64,
    })
}
