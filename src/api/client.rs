//! HTTP implementation of the video API
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with timeouts and a user agent
//! - Binding a credential to the search, videos and channels endpoints
//! - Decoding JSON bodies into typed responses
//! - Error classification

use crate::api::types::{ChannelItem, ListResponse, SearchItem, VideoItem};
use crate::api::{ApiConnector, ApiError, ApiResult, SearchRequest, VideoApi};
use crate::config::ApiConfig;
use crate::credentials::Credential;
use crate::ConfigError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client shared by every credential
///
/// # Example
///
/// ```no_run
/// use vidscout::config::ApiConfig;
/// use vidscout::api::build_http_client;
///
/// let client = build_http_client(&ApiConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("vidscout/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Resolved endpoint URLs
#[derive(Debug)]
struct Endpoints {
    search: Url,
    videos: Url,
    channels: Url,
}

impl Endpoints {
    fn new(base_url: &str) -> Result<Self, ConfigError> {
        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |name: &str| {
            base.join(name)
                .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint {}: {}", name, e)))
        };

        Ok(Self {
            search: join("search")?,
            videos: join("videos")?,
            channels: join("channels")?,
        })
    }
}

/// Creates `HttpVideoApi` clients sharing one connection pool
pub struct HttpConnector {
    client: Client,
    endpoints: Arc<Endpoints>,
}

impl HttpConnector {
    pub fn new(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            endpoints: Arc::new(Endpoints::new(base_url)?),
        })
    }

    /// Builds the HTTP client and connector from the API configuration
    pub fn from_config(config: &ApiConfig) -> crate::Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::new(client, &config.base_url)?)
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self, credential: &Credential) -> Arc<dyn VideoApi> {
        Arc::new(HttpVideoApi {
            client: self.client.clone(),
            endpoints: Arc::clone(&self.endpoints),
            key: credential.expose().to_string(),
        })
    }
}

/// Video API client bound to a single API key
pub struct HttpVideoApi {
    client: Client,
    endpoints: Arc<Endpoints>,
    key: String,
}

impl HttpVideoApi {
    /// Sends a GET with the given query parameters plus the API key
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with decodable body | `Ok` |
    /// | HTTP 403 / 429 | `QuotaExceeded` |
    /// | Other non-2xx | `UnexpectedStatus` |
    /// | Timeout / connect / body read failure | `Network` |
    /// | Body is not the expected JSON | `Decode` |
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .query(&[("key", self.key.as_str())])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoApi for HttpVideoApi {
    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<SearchItem>> {
        let params = [
            ("part", "id".to_string()),
            ("q", request.query.clone()),
            ("type", request.content_type.clone()),
            ("maxResults", request.page_size.to_string()),
            ("order", request.order.as_str().to_string()),
        ];
        let response: ListResponse<SearchItem> =
            self.get_json(&self.endpoints.search, &params).await?;
        Ok(response.items)
    }

    async fn videos(&self, ids: &[String]) -> ApiResult<Vec<VideoItem>> {
        let params = [
            ("part", "snippet,contentDetails,statistics".to_string()),
            ("id", ids.join(",")),
        ];
        let response: ListResponse<VideoItem> =
            self.get_json(&self.endpoints.videos, &params).await?;
        Ok(response.items)
    }

    async fn channels(&self, ids: &[String]) -> ApiResult<Vec<ChannelItem>> {
        let params = [("part", "statistics".to_string()), ("id", ids.join(","))];
        let response: ListResponse<ChannelItem> =
            self.get_json(&self.endpoints.channels, &params).await?;
        Ok(response.items)
    }
}

fn classify_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network("request timeout".to_string())
    } else if e.is_connect() {
        ApiError::Network(format!("connection failed: {}", e))
    } else {
        ApiError::Network(e.to_string())
    }
}
