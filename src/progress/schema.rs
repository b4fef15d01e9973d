//! Database schema definitions for the run journal

use rusqlite::Connection;

/// SQL schema for the journal
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    queries_completed INTEGER NOT NULL DEFAULT 0,
    rows_written INTEGER NOT NULL DEFAULT 0
);

-- Queries whose rows are fully appended to the dataset
CREATE TABLE IF NOT EXISTS completed_queries (
    query TEXT PRIMARY KEY,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    rows_appended INTEGER NOT NULL,
    completed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_completed_queries_run ON completed_queries(run_id);
"#;

/// Creates all tables and indexes if they do not exist yet
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
