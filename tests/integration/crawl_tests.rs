//! Full crawl runs over HTTP

use crate::common::{
    channel_json, create_test_config, endpoint, quota_body, search_body, video_json,
};
use serde_json::json;
use tempfile::TempDir;
use vidscout::pipeline::{CrawlOrchestrator, CrawlOutcome};
use vidscout::progress::{Dataset, RunStatus, COLUMNS};
use vidscout::CrawlPhase;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_channels(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(endpoint("channels")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [channel_json("UC1", "1200")]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_query() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("q", "lofi"))
        .and(query_param("order", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["v1"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("q", "lofi"))
        .and(query_param("order", "date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["v2", "v1", "v3"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("videos")))
        .and(query_param("id", "v1,v2,v3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                video_json("v1", "Rainy beats", "PT1M", "UC1"),
                video_json("v2", "Night drive", "PT1M1S", "UC1"),
                video_json("v3", "Mix - Lofi radio", "PT2H", "UC1")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_channels(&server).await;

    let config = create_test_config(&server.uri(), &["key-aaaa"], &["lofi"], dir.path());
    let mut orchestrator = CrawlOrchestrator::from_config(&config, "test-hash").unwrap();
    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.rows_written, 2);
    assert_eq!(orchestrator.phase(), CrawlPhase::Done);

    // Raw file layout
    let raw = std::fs::read_to_string(&config.output.dataset_path).unwrap();
    let mut lines = raw.lines();
    assert_eq!(lines.next().unwrap(), COLUMNS.join(";"));
    assert_eq!(lines.count(), 2);

    let rows = Dataset::new(&config.output.dataset_path).read_rows().unwrap();
    let v1 = &rows[0];
    assert_eq!(v1.video_id, "v1");
    assert_eq!(v1.search_type, "relevance");
    assert_eq!(v1.duration_sec, 60);
    assert_eq!(v1.is_shorts, 1);
    assert_eq!(v1.views, 1500);
    assert_eq!(v1.like_count, 120);
    assert_eq!(v1.comment_count, 7);
    assert_eq!(v1.upload_date, "2023-11-20T08:15:00Z");
    assert_eq!(v1.video_url, "https://www.youtube.com/watch?v=v1");
    assert_eq!(v1.thumbnail_url, "https://i.ytimg.com/vi/v1/hqdefault.jpg");
    assert_eq!(v1.desc, "First line Second line for v1");
    assert_eq!(v1.tags, "music, chill");
    assert_eq!(v1.category, "10");
    assert_eq!(v1.follower_count, 1200);
    assert_eq!(v1.default_language, "en-US");
    assert!(!v1.has_manuel_subtitle);

    let v2 = &rows[1];
    assert_eq!(v2.video_id, "v2");
    assert_eq!(v2.search_type, "date");
    assert_eq!(v2.duration_sec, 61);
    assert_eq!(v2.is_shorts, 0);

    // A second run finds the query complete and calls nothing
    let mut orchestrator = CrawlOrchestrator::from_config(&config, "test-hash").unwrap();
    let report = orchestrator.run().await.unwrap();
    assert_eq!(report.queries_skipped, 1);
    assert_eq!(report.api_calls, 0);
    assert_eq!(
        Dataset::new(&config.output.dataset_path).read_rows().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_rotates_to_next_key_on_quota() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(query_param("key", "key-aaaa"))
        .respond_with(ResponseTemplate::new(403).set_body_json(quota_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("key", "key-bbbb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["v1"])))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("videos")))
        .and(query_param("key", "key-bbbb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [video_json("v1", "Rainy beats", "PT3M", "UC1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("channels")))
        .and(query_param("key", "key-bbbb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [channel_json("UC1", "1200")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(
        &server.uri(),
        &["key-aaaa", "key-bbbb"],
        &["lofi"],
        dir.path(),
    );
    let mut orchestrator = CrawlOrchestrator::from_config(&config, "test-hash").unwrap();
    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.rows_written, 1);
    assert_eq!(report.rotations, 1);
    assert_eq!(orchestrator.invoker().rotor().position(), 1);
}

#[tokio::test]
async fn test_exhaustion_stops_run_and_next_run_resumes() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("q", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["a1"])))
        .mount(&server)
        .await;

    // The first key runs out during the second query
    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("q", "beta"))
        .and(query_param("key", "key-aaaa"))
        .respond_with(ResponseTemplate::new(403).set_body_json(quota_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .and(query_param("q", "beta"))
        .and(query_param("key", "key-bbbb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["b1"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("videos")))
        .and(query_param("id", "a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [video_json("a1", "Alpha", "PT5M", "UC1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("videos")))
        .and(query_param("id", "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [video_json("b1", "Beta", "PT30S", "UC1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_channels(&server).await;

    let first = create_test_config(&server.uri(), &["key-aaaa"], &["alpha", "beta"], dir.path());
    let mut orchestrator = CrawlOrchestrator::from_config(&first, "hash-1").unwrap();
    let report = orchestrator.run().await.unwrap();

    assert_eq!(
        report.outcome,
        CrawlOutcome::CredentialsExhausted {
            query: "beta".to_string()
        }
    );
    assert_eq!(report.queries_processed, 1);
    assert_eq!(orchestrator.phase(), CrawlPhase::FatalAbort);
    let run = orchestrator.store().journal().get_run(report.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Exhausted);
    assert_eq!(run.queries_completed, 1);

    let rows = Dataset::new(&first.output.dataset_path).read_rows().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].video_id, "a1");

    let second = create_test_config(&server.uri(), &["key-bbbb"], &["alpha", "beta"], dir.path());
    let mut orchestrator = CrawlOrchestrator::from_config(&second, "hash-2").unwrap();
    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.queries_skipped, 1);
    assert_eq!(report.queries_processed, 1);

    let rows = Dataset::new(&second.output.dataset_path).read_rows().unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "b1"]);
    assert_eq!(rows[1].query_used, "beta");
    assert_eq!(rows[1].is_shorts, 1);
}

#[tokio::test]
async fn test_failed_detail_batch_still_completes_query() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(endpoint("search")))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["v1"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint("videos")))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &["key-aaaa"], &["lofi"], dir.path());
    let mut orchestrator = CrawlOrchestrator::from_config(&config, "test-hash").unwrap();
    let report = orchestrator.run().await.unwrap();

    // The query yields nothing but still counts as done
    assert_eq!(report.outcome, CrawlOutcome::Completed);
    assert_eq!(report.rows_written, 0);
    assert_eq!(report.queries_processed, 1);
    assert!(orchestrator
        .store()
        .journal()
        .completed_queries()
        .unwrap()
        .contains("lofi"));
}
