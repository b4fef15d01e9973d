//! Remote video API access
//!
//! This module contains everything that talks to the video API:
//! - Typed request/response structures
//! - The `VideoApi` trait the crawl pipeline is written against
//! - The reqwest-backed implementation and its connector
//! - Failure classification (quota exhaustion vs. everything else)

mod client;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{build_http_client, HttpConnector, HttpVideoApi};
pub use types::{
    ChannelItem, ChannelStatistics, ContentDetails, ListResponse, SearchItem, SearchItemId,
    Snippet, Thumbnail, Thumbnails, VideoItem, VideoStatistics,
};

use crate::config::SortStrategy;
use crate::credentials::Credential;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The credential's quota or rate limit is used up (HTTP 403/429)
    #[error("quota exceeded (HTTP {status}): {reason}")]
    QuotaExceeded { status: u16, reason: String },

    /// Any other non-success status
    #[error("unexpected HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Transport failure (connect, timeout, reset)
    #[error("network error: {0}")]
    Network(String),

    /// The body could not be decoded into the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-success HTTP status
    ///
    /// 403 and 429 are how the API signals an exhausted key; the body is only
    /// used to make the log line useful.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = types::describe_error_body(body);
        match status {
            403 | 429 => Self::QuotaExceeded {
                status,
                reason: detail,
            },
            _ => Self::UnexpectedStatus {
                status,
                message: detail,
            },
        }
    }

    /// Returns true if rotating to another credential may fix this failure
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Result type for remote calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Parameters of one search call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub content_type: String,
    pub page_size: usize,
    pub order: SortStrategy,
}

/// A video API client bound to one credential
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// Runs one search and returns the first page of hits
    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<SearchItem>>;

    /// Fetches snippet, content details and statistics for up to one batch of videos
    async fn videos(&self, ids: &[String]) -> ApiResult<Vec<VideoItem>>;

    /// Fetches statistics for up to one batch of channels
    async fn channels(&self, ids: &[String]) -> ApiResult<Vec<ChannelItem>>;
}

/// Builds `VideoApi` clients for a given credential
pub trait ApiConnector: Send + Sync {
    fn connect(&self, credential: &Credential) -> Arc<dyn VideoApi>;
}
