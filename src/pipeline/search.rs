//! Multi-strategy search expansion
//!
//! One query is searched once per sort strategy. Hits are merged in discovery
//! order and each id keeps the first strategy that returned it.

use crate::api::SearchRequest;
use crate::config::{Config, SortStrategy};
use crate::credentials::{CredentialsExhausted, ResilientInvoker, SearchOperation};
use crate::pipeline::record::CandidateId;
use crate::state::RunState;
use std::collections::HashSet;

/// Expands a query into new candidate ids
#[derive(Debug, Clone)]
pub struct SearchExpander {
    strategies: Vec<SortStrategy>,
    content_type: String,
    page_size: usize,
}

impl SearchExpander {
    pub fn new(strategies: Vec<SortStrategy>, content_type: impl Into<String>, page_size: usize) -> Self {
        Self {
            strategies,
            content_type: content_type.into(),
            page_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.crawl.sort_strategies.clone(),
            config.api.content_type.clone(),
            config.api.search_page_size,
        )
    }

    /// Runs every strategy for `query` and returns ids not in `state`
    ///
    /// A failed strategy is logged and skipped. Only running out of
    /// credentials stops the expansion.
    pub async fn expand(
        &self,
        invoker: &mut ResilientInvoker,
        query: &str,
        state: &RunState,
    ) -> Result<Vec<CandidateId>, CredentialsExhausted> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut candidates = Vec::new();

        for &strategy in &self.strategies {
            let operation = SearchOperation {
                request: SearchRequest {
                    query: query.to_string(),
                    content_type: self.content_type.clone(),
                    page_size: self.page_size,
                    order: strategy,
                },
            };

            let Some(items) = invoker.invoke(&operation).await.into_result()? else {
                continue;
            };

            let before = candidates.len();
            for video_id in items.into_iter().filter_map(|item| item.id.video_id) {
                if state.contains_id(&video_id) || !seen.insert(video_id.clone()) {
                    continue;
                }
                candidates.push(CandidateId { video_id, strategy });
            }
            tracing::debug!(
                "'{}' by {}: {} new ids",
                query,
                strategy,
                candidates.len() - before
            );
        }

        Ok(candidates)
    }
}
