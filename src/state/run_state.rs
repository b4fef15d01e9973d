use std::collections::HashSet;

/// Progress carried across runs
///
/// Holds every video id already in the dataset and every query already fully
/// processed. Both sets only ever grow.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    known_ids: HashSet<String>,
    completed_queries: HashSet<String>,
}

impl RunState {
    /// Creates an empty state (first run)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(known_ids: HashSet<String>, completed_queries: HashSet<String>) -> Self {
        Self {
            known_ids,
            completed_queries,
        }
    }

    /// Returns true if the video is already in the dataset
    pub fn contains_id(&self, id: &str) -> bool {
        self.known_ids.contains(id)
    }

    /// Returns true if the query finished in this or an earlier run
    pub fn is_query_complete(&self, query: &str) -> bool {
        self.completed_queries.contains(query)
    }

    /// Records a finished query together with the ids it persisted
    ///
    /// Call only after the rows are durably written.
    pub fn record_query<I, S>(&mut self, query: &str, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_ids.extend(ids.into_iter().map(Into::into));
        self.completed_queries.insert(query.to_string());
    }

    pub fn known_id_count(&self) -> usize {
        self.known_ids.len()
    }

    pub fn completed_query_count(&self) -> usize {
        self.completed_queries.len()
    }
}
