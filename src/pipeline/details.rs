//! Detail enrichment for candidate videos

use crate::api::VideoItem;
use crate::config::{Config, SortStrategy};
use crate::credentials::{CredentialsExhausted, ResilientInvoker, VideoDetailsOperation};
use crate::duration::{is_short_form, parse_duration};
use crate::pipeline::record::{CandidateId, VideoRecord};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Language recorded when the video declares none
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Records built for one query plus the channels they belong to
#[derive(Debug, Default)]
pub struct DetailBatch {
    pub records: Vec<VideoRecord>,
    /// Distinct channel ids in first-seen order
    pub channel_ids: Vec<String>,
    /// Batches dropped because their call failed
    pub failed_batches: usize,
}

/// Fetches full metadata in batches and normalizes it into records
#[derive(Debug, Clone)]
pub struct DetailEnricher {
    batch_size: usize,
    short_form_threshold_secs: u64,
    synthetic_title_prefixes: Vec<String>,
}

impl DetailEnricher {
    pub fn new(
        batch_size: usize,
        short_form_threshold_secs: u64,
        synthetic_title_prefixes: Vec<String>,
    ) -> Self {
        Self {
            batch_size: batch_size.max(1),
            short_form_threshold_secs,
            synthetic_title_prefixes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api.batch_size,
            config.crawl.short_form_threshold_secs,
            config.crawl.synthetic_title_prefixes.clone(),
        )
    }

    /// Enriches candidates in order, one remote call per batch
    ///
    /// Records follow the order the API returns them within each batch.
    /// Ids the API does not return are silently absent.
    pub async fn enrich(
        &self,
        invoker: &mut ResilientInvoker,
        query: &str,
        candidates: &[CandidateId],
    ) -> Result<DetailBatch, CredentialsExhausted> {
        let strategies: HashMap<&str, SortStrategy> = candidates
            .iter()
            .map(|c| (c.video_id.as_str(), c.strategy))
            .collect();
        let mut emitted: HashSet<String> = HashSet::new();
        let mut seen_channels: HashSet<String> = HashSet::new();
        let mut batch = DetailBatch::default();

        for chunk in candidates.chunks(self.batch_size) {
            let operation = VideoDetailsOperation {
                ids: chunk.iter().map(|c| c.video_id.clone()).collect(),
            };

            let Some(items) = invoker.invoke(&operation).await.into_result()? else {
                batch.failed_batches += 1;
                continue;
            };

            for item in items {
                let Some(&strategy) = strategies.get(item.id.as_str()) else {
                    tracing::debug!("Ignoring unrequested video {}", item.id);
                    continue;
                };
                if emitted.contains(&item.id) {
                    continue;
                }
                let Some(record) = self.build_record(query, strategy, item) else {
                    continue;
                };

                emitted.insert(record.video_id.clone());
                if let Some(channel_id) = &record.channel_id {
                    if seen_channels.insert(channel_id.clone()) {
                        batch.channel_ids.push(channel_id.clone());
                    }
                }
                batch.records.push(record);
            }
        }

        Ok(batch)
    }

    /// True for auto-generated compilations such as "Mix - Artist"
    pub fn is_synthetic_title(&self, title: &str) -> bool {
        self.synthetic_title_prefixes
            .iter()
            .any(|prefix| title.starts_with(prefix.as_str()))
    }

    /// Normalizes one API item; returns `None` for synthetic titles
    pub fn build_record(
        &self,
        query: &str,
        strategy: SortStrategy,
        item: VideoItem,
    ) -> Option<VideoRecord> {
        let VideoItem {
            id,
            snippet,
            content_details,
            statistics,
        } = item;

        let title = snippet.title.unwrap_or_default();
        if self.is_synthetic_title(&title) {
            tracing::debug!("Dropping synthetic title '{}'", title);
            return None;
        }

        let duration_secs = content_details
            .duration
            .as_deref()
            .map(parse_duration)
            .unwrap_or(0);

        let uploaded_at = snippet.published_at.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .ok()
        });

        Some(VideoRecord {
            query: query.to_string(),
            strategy,
            title,
            duration_secs,
            is_short: is_short_form(duration_secs, self.short_form_threshold_secs),
            views: statistics.view_count.unwrap_or(0),
            likes: statistics.like_count.unwrap_or(0),
            comments: statistics.comment_count.unwrap_or(0),
            uploaded_at,
            thumbnail_url: snippet
                .thumbnails
                .high
                .map(|t| t.url)
                .unwrap_or_default(),
            description: flatten_lines(&snippet.description.unwrap_or_default()),
            tags: snippet.tags,
            category: snippet.category_id.unwrap_or_default(),
            default_language: snippet
                .default_audio_language
                .filter(|lang| !lang.is_empty())
                .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string()),
            has_captions: content_details.caption.as_deref() == Some("true"),
            video_id: id,
            channel_id: snippet.channel_id.filter(|c| !c.is_empty()),
        })
    }
}

/// Replaces line breaks with spaces so a record stays on one line
fn flatten_lines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
