//! In-memory video API for unit tests
//!
//! Holds a small catalog, per-key call quotas and forced failures, and records
//! every connection and call so tests can assert on rotation behaviour.

use crate::api::{
    ApiConnector, ApiError, ApiResult, ChannelItem, ChannelStatistics, ContentDetails,
    SearchItem, SearchItemId, SearchRequest, Snippet, Thumbnail, Thumbnails, VideoApi, VideoItem,
    VideoStatistics,
};
use crate::config::SortStrategy;
use crate::credentials::Credential;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Search,
    Videos,
    Channels,
}

#[derive(Default)]
struct FakeState {
    searches: HashMap<(String, SortStrategy), Vec<String>>,
    videos: HashMap<String, VideoItem>,
    channels: HashMap<String, Option<u64>>,
    quotas: HashMap<String, usize>,
    failing: HashSet<Endpoint>,
    connections: Vec<String>,
    calls: Vec<(String, Endpoint)>,
}

/// Shared handle to the fake catalog; clones see the same state
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn connector(&self) -> Arc<dyn ApiConnector> {
        Arc::new(FakeConnector {
            state: Arc::clone(&self.state),
        })
    }

    pub fn add_search(&self, query: &str, strategy: SortStrategy, ids: &[&str]) {
        self.lock().searches.insert(
            (query.to_string(), strategy),
            ids.iter().map(|id| id.to_string()).collect(),
        );
    }

    pub fn add_video(&self, item: VideoItem) {
        self.lock().videos.insert(item.id.clone(), item);
    }

    pub fn add_channel(&self, id: &str, subscribers: Option<u64>) {
        self.lock().channels.insert(id.to_string(), subscribers);
    }

    /// Every call with this key fails with a quota error
    pub fn exhaust_key(&self, key: &str) {
        self.set_quota(key, 0);
    }

    /// This key succeeds `calls` more times, then fails with a quota error
    pub fn set_quota(&self, key: &str, calls: usize) {
        self.lock().quotas.insert(key.to_string(), calls);
    }

    pub fn fail_endpoint(&self, endpoint: Endpoint) {
        self.lock().failing.insert(endpoint);
    }

    /// Keys that clients were built for, in order
    pub fn connections(&self) -> Vec<String> {
        self.lock().connections.clone()
    }

    pub fn calls_for_key(&self, key: &str) -> usize {
        self.lock().calls.iter().filter(|(k, _)| k == key).count()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.iter().filter(|(_, e)| *e == endpoint).count()
    }
}

struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl ApiConnector for FakeConnector {
    fn connect(&self, credential: &Credential) -> Arc<dyn VideoApi> {
        let key = credential.expose().to_string();
        self.state.lock().unwrap().connections.push(key.clone());
        Arc::new(FakeClient {
            key,
            state: Arc::clone(&self.state),
        })
    }
}

struct FakeClient {
    key: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeClient {
    /// Records the call and applies quota and forced-failure rules
    fn begin(&self, endpoint: Endpoint) -> ApiResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((self.key.clone(), endpoint));

        if let Some(remaining) = state.quotas.get_mut(&self.key) {
            if *remaining == 0 {
                return Err(ApiError::QuotaExceeded {
                    status: 403,
                    reason: "quotaExceeded".to_string(),
                });
            }
            *remaining -= 1;
        }

        if state.failing.contains(&endpoint) {
            return Err(ApiError::UnexpectedStatus {
                status: 500,
                message: "backendError".to_string(),
            });
        }

        Ok(state)
    }
}

#[async_trait]
impl VideoApi for FakeClient {
    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<SearchItem>> {
        let state = self.begin(Endpoint::Search)?;
        let ids = state
            .searches
            .get(&(request.query.clone(), request.order))
            .cloned()
            .unwrap_or_default();

        Ok(ids
            .into_iter()
            .take(request.page_size)
            .map(|id| SearchItem {
                id: SearchItemId {
                    kind: Some("youtube#video".to_string()),
                    video_id: Some(id),
                },
            })
            .collect())
    }

    async fn videos(&self, ids: &[String]) -> ApiResult<Vec<VideoItem>> {
        let state = self.begin(Endpoint::Videos)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.videos.get(id).cloned())
            .collect())
    }

    async fn channels(&self, ids: &[String]) -> ApiResult<Vec<ChannelItem>> {
        let state = self.begin(Endpoint::Channels)?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                state.channels.get(id).map(|subscribers| ChannelItem {
                    id: id.clone(),
                    statistics: ChannelStatistics {
                        subscriber_count: *subscribers,
                        hidden_subscriber_count: subscribers.is_none(),
                    },
                })
            })
            .collect())
    }
}

/// A fully populated video item
pub fn video(id: &str, title: &str, duration: &str, channel: &str) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        snippet: Snippet {
            title: Some(title.to_string()),
            description: Some(format!("About {}", title)),
            tags: vec!["tag one".to_string(), "tag two".to_string()],
            published_at: Some("2024-05-01T10:30:00Z".to_string()),
            channel_id: Some(channel.to_string()),
            category_id: Some("20".to_string()),
            default_audio_language: Some("en".to_string()),
            thumbnails: Thumbnails {
                high: Some(Thumbnail {
                    url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
                }),
            },
        },
        content_details: ContentDetails {
            duration: Some(duration.to_string()),
            caption: Some("true".to_string()),
        },
        statistics: VideoStatistics {
            view_count: Some(1_000),
            like_count: Some(50),
            comment_count: Some(5),
        },
    }
}
