use crate::config::SortStrategy;
use crate::progress::DatasetRow;
use chrono::{DateTime, SecondsFormat, Utc};

/// Public watch URL prefix; the video id is appended
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// A search hit not yet seen, with the sort order that found it first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateId {
    pub video_id: String,
    pub strategy: SortStrategy,
}

/// A fully enriched video, waiting for its channel's follower count
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub query: String,
    pub strategy: SortStrategy,
    pub title: String,
    pub duration_secs: u64,
    pub is_short: bool,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub thumbnail_url: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub default_language: String,
    pub has_captions: bool,
    pub video_id: String,
    /// Only used to join the follower count; not persisted
    pub channel_id: Option<String>,
}

impl VideoRecord {
    pub fn video_url(&self) -> String {
        format!("{}{}", WATCH_URL_PREFIX, self.video_id)
    }

    /// Final dataset row with the follower count attached
    pub fn into_row(self, follower_count: u64) -> DatasetRow {
        let video_url = self.video_url();
        DatasetRow {
            query_used: self.query,
            search_type: self.strategy.as_str().to_string(),
            video_title: self.title,
            duration_sec: self.duration_secs,
            is_shorts: u8::from(self.is_short),
            views: self.views,
            like_count: self.likes,
            comment_count: self.comments,
            upload_date: self
                .uploaded_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            video_url,
            thumbnail_url: self.thumbnail_url,
            desc: self.description,
            tags: self.tags.join(", "),
            category: self.category,
            follower_count,
            default_language: self.default_language,
            video_id: self.video_id,
            has_manuel_subtitle: self.has_captions,
        }
    }
}
