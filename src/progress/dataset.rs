//! Semicolon-delimited dataset file
//!
//! The dataset is append-only. Each query's rows go out in a single write
//! followed by `fsync`, and the header is only written when the file is new.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column names, in file order
pub const COLUMNS: [&str; 18] = [
    "query_used",
    "search_type",
    "video_title",
    "duration_sec",
    "is_shorts",
    "views",
    "like_count",
    "comment_count",
    "upload_date",
    "video_url",
    "thumbnail_url",
    "desc",
    "tags",
    "category",
    "follower_count",
    "default_language",
    "video_id",
    "has_manuel_subtitle",
];

const DELIMITER: u8 = b';';

/// Errors that can occur while reading or appending the dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing column '{0}'")]
    MissingColumn(&'static str),
}

/// One persisted row; field order matches `COLUMNS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub query_used: String,
    pub search_type: String,
    pub video_title: String,
    pub duration_sec: u64,
    pub is_shorts: u8,
    pub views: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub upload_date: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub desc: String,
    pub tags: String,
    pub category: String,
    pub follower_count: u64,
    pub default_language: String,
    pub video_id: String,
    pub has_manuel_subtitle: bool,
}

/// What the resume logic needs from an existing dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetSnapshot {
    pub video_ids: HashSet<String>,
    pub queries: HashSet<String>,
    pub rows: usize,
    pub skipped_records: usize,
}

/// Handle to the dataset file
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
}

impl Dataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the ids and queries already persisted
    ///
    /// A missing file is an empty snapshot. A file without the `video_id` or
    /// `query_used` column is an error; records that fail to parse are
    /// counted and skipped.
    pub fn read_snapshot(&self) -> Result<DatasetSnapshot, DatasetError> {
        if !self.exists() {
            return Ok(DatasetSnapshot::default());
        }

        let mut reader = self.reader()?;
        let headers = reader.headers()?.clone();
        let id_column = column_index(&headers, "video_id")?;
        let query_column = column_index(&headers, "query_used")?;

        let mut snapshot = DatasetSnapshot::default();
        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!("Skipping unreadable dataset record: {}", e);
                    snapshot.skipped_records += 1;
                    continue;
                }
            };

            let id = record.get(id_column).unwrap_or("");
            if id.is_empty() {
                snapshot.skipped_records += 1;
                continue;
            }
            snapshot.video_ids.insert(id.to_string());

            if let Some(query) = record.get(query_column).filter(|q| !q.is_empty()) {
                snapshot.queries.insert(query.to_string());
            }
            snapshot.rows += 1;
        }

        Ok(snapshot)
    }

    /// Reads every well-formed row (used for reporting)
    pub fn read_rows(&self) -> Result<Vec<DatasetRow>, DatasetError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let mut reader = self.reader()?;
        let mut rows = Vec::new();
        for result in reader.deserialize::<DatasetRow>() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => tracing::debug!("Skipping malformed dataset row: {}", e),
            }
        }
        Ok(rows)
    }

    /// Appends rows, writing the header first if the file is new or empty
    ///
    /// Returns the number of rows written. An empty slice writes nothing and
    /// does not create the file.
    pub fn append(&self, rows: &[DatasetRow]) -> Result<usize, DatasetError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let existing_len = self.current_len()?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(Vec::new());

        if existing_len == 0 {
            writer.write_record(COLUMNS)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        let mut buffer = writer
            .into_inner()
            .map_err(|e| DatasetError::Io(std::io::Error::new(e.error().kind(), e.to_string())))?;

        // A crash can leave a torn last line; never glue a new row onto it
        if existing_len > 0 && !self.ends_with_newline()? {
            buffer.insert(0, b'\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&buffer)?;
        file.sync_all()?;

        Ok(rows.len())
    }

    fn reader(&self) -> Result<csv::Reader<File>, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .flexible(true)
            .from_path(&self.path)?;

        // Files written by spreadsheet tools may start with a BOM
        let cleaned: csv::StringRecord = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        reader.set_headers(cleaned);
        Ok(reader)
    }

    /// Size of the file on disk, 0 if it does not exist yet
    fn current_len(&self) -> Result<u64, DatasetError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn ends_with_newline(&self) -> Result<bool, DatasetError> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }
}

fn column_index(headers: &csv::StringRecord, name: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(DatasetError::MissingColumn(name))
}
