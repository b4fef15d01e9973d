//! HTTP client tests: request shape and failure classification

use crate::common::{channel_json, endpoint, quota_body, search_body, video_json, API_PREFIX};
use serde_json::json;
use std::sync::Arc;
use vidscout::api::{build_http_client, ApiConnector, ApiError, HttpConnector, SearchRequest, VideoApi};
use vidscout::config::{ApiConfig, SortStrategy};
use vidscout::credentials::Credential;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connect(server: &MockServer, key: &str) -> Arc<dyn VideoApi> {
    let client = build_http_client(&ApiConfig::default()).expect("client builds");
    let base = format!("{}{}", server.uri(), API_PREFIX);
    let connector = HttpConnector::new(client, &base).expect("valid base url");
    connector.connect(&Credential::new(key))
}

fn request(query: &str, order: SortStrategy) -> SearchRequest {
    SearchRequest {
        query: query.to_string(),
        content_type: "video".to_string(),
        page_size: 50,
        order,
    }
}

#[tokio::test]
async fn test_search_sends_expected_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("part", "id"))
        .and(query_param("q", "lofi hip hop"))
        .and(query_param("type", "video"))
        .and(query_param("maxResults", "50"))
        .and(query_param("order", "viewCount"))
        .and(query_param("key", "key-abcd"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["v1", "v2"])))
        .expect(1)
        .mount(&server)
        .await;

    let api = connect(&server, "key-abcd");
    let items = api
        .search(&request("lofi hip hop", SortStrategy::ViewCount))
        .await
        .expect("search succeeds");

    let ids: Vec<_> = items.into_iter().filter_map(|i| i.id.video_id).collect();
    assert_eq!(ids, vec!["v1", "v2"]);
}

#[tokio::test]
async fn test_search_ignores_channel_and_playlist_hits() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": {"kind": "youtube#channel", "channelId": "UC1"}},
                {"id": {"kind": "youtube#video", "videoId": "v1"}},
                {"id": {"kind": "youtube#playlist", "playlistId": "PL1"}}
            ]
        })))
        .mount(&server)
        .await;

    let items = connect(&server, "key-abcd")
        .search(&request("lofi", SortStrategy::Date))
        .await
        .expect("search succeeds");
    let ids: Vec<_> = items.into_iter().filter_map(|i| i.id.video_id).collect();
    assert_eq!(ids, vec!["v1"]);
}

#[tokio::test]
async fn test_videos_joins_ids_and_decodes_string_counts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(endpoint("videos")))
        .and(query_param("part", "snippet,contentDetails,statistics"))
        .and(query_param("id", "v1,v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                video_json("v1", "First", "PT4M13S", "UC1"),
                {"id": "v2", "snippet": {"title": "Bare"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = connect(&server, "key-abcd")
        .videos(&["v1".to_string(), "v2".to_string()])
        .await
        .expect("videos succeeds");

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].statistics.view_count, Some(1500));
    assert_eq!(items[0].content_details.duration.as_deref(), Some("PT4M13S"));
    assert_eq!(items[0].snippet.tags, vec!["music", "chill"]);
    assert_eq!(items[1].statistics.view_count, None);
    assert!(items[1].snippet.thumbnails.high.is_none());
}

#[tokio::test]
async fn test_channels_decodes_hidden_counts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(endpoint("channels")))
        .and(query_param("part", "statistics"))
        .and(query_param("id", "UC1,UC2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                channel_json("UC1", "98000"),
                {"id": "UC2", "statistics": {"hiddenSubscriberCount": true}}
            ]
        })))
        .mount(&server)
        .await;

    let items = connect(&server, "key-abcd")
        .channels(&["UC1".to_string(), "UC2".to_string()])
        .await
        .expect("channels succeeds");

    assert_eq!(items[0].statistics.subscriber_count, Some(98_000));
    assert!(!items[0].statistics.hidden_subscriber_count);
    assert_eq!(items[1].statistics.subscriber_count, None);
    assert!(items[1].statistics.hidden_subscriber_count);
}

#[tokio::test]
async fn test_forbidden_is_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(quota_body()))
        .mount(&server)
        .await;

    let err = connect(&server, "key-abcd")
        .search(&request("lofi", SortStrategy::Date))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::QuotaExceeded {
            status: 403,
            reason: "quotaExceeded".to_string()
        }
    );
    assert!(err.is_quota());
}

#[tokio::test]
async fn test_too_many_requests_is_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = connect(&server, "key-abcd")
        .videos(&["v1".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::QuotaExceeded { status: 429, .. }));
}

#[tokio::test]
async fn test_server_error_is_not_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "Backend Error"}
        })))
        .mount(&server)
        .await;

    let err = connect(&server, "key-abcd")
        .search(&request("lofi", SortStrategy::Date))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::UnexpectedStatus {
            status: 500,
            message: "Backend Error".to_string()
        }
    );
    assert!(!err.is_quota());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = connect(&server, "key-abcd")
        .channels(&["UC1".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let server = MockServer::start().await;
    let api = connect(&server, "key-abcd");
    drop(server);

    let err = api
        .search(&request("lofi", SortStrategy::Date))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
