//! Shared fixtures for integration tests

use serde_json::{json, Value};
use std::path::Path;
use vidscout::config::{Config, OutputConfig, SortStrategy};

/// API base path, mirroring the real service's layout
pub const API_PREFIX: &str = "/youtube/v3";

/// Creates a test configuration pointing at the mock server
pub fn create_test_config(base_url: &str, keys: &[&str], queries: &[&str], dir: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = format!("{}{}", base_url, API_PREFIX);
    config.api.credentials = keys.iter().map(|k| k.to_string()).collect();
    config.api.request_timeout_secs = 5;
    config.crawl.queries = queries.iter().map(|q| q.to_string()).collect();
    config.crawl.sort_strategies = vec![SortStrategy::Relevance, SortStrategy::Date];
    config.output = OutputConfig {
        dataset_path: dir.join("dataset.csv").display().to_string(),
        journal_path: dir.join("journal.db").display().to_string(),
    };
    config
}

pub fn endpoint(name: &str) -> String {
    format!("{}/{}", API_PREFIX, name)
}

/// Search response body with one video hit per id
pub fn search_body(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"kind": "youtube#searchResult", "id": {"kind": "youtube#video", "videoId": id}}))
        .collect();
    json!({ "kind": "youtube#searchListResponse", "items": items })
}

/// Detail entry the way the API returns it, counters as strings
pub fn video_json(id: &str, title: &str, duration: &str, channel: &str) -> Value {
    json!({
        "kind": "youtube#video",
        "id": id,
        "snippet": {
            "publishedAt": "2023-11-20T08:15:00Z",
            "channelId": channel,
            "title": title,
            "description": format!("First line\nSecond line for {}", id),
            "thumbnails": {
                "default": {"url": format!("https://i.ytimg.com/vi/{}/default.jpg", id)},
                "high": {"url": format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id)}
            },
            "tags": ["music", "chill"],
            "categoryId": "10",
            "defaultAudioLanguage": "en-US"
        },
        "contentDetails": {"duration": duration, "caption": "false"},
        "statistics": {"viewCount": "1500", "likeCount": "120", "commentCount": "7"}
    })
}

pub fn channel_json(id: &str, subscribers: &str) -> Value {
    json!({
        "id": id,
        "statistics": {"subscriberCount": subscribers, "hiddenSubscriberCount": false}
    })
}

/// Error body used by the API for an exhausted key
pub fn quota_body() -> Value {
    json!({
        "error": {
            "code": 403,
            "message": "The request cannot be completed because you have exceeded your quota.",
            "errors": [{"reason": "quotaExceeded", "domain": "youtube.quota"}]
        }
    })
}
