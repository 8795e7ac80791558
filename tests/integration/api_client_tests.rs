//! Integration tests for the backend client
//!
//! These tests use wiremock to stand in for the crawl backend.

use crawl_console::api::{ApiClient, ExportFormat, ExportOptions, JobStatus};
use crawl_console::CrawlError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_base_url(&format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("Failed to build client")
}

fn job_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "url": "https://example.com",
        "status": status,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:05:00Z"
    })
}

#[tokio::test]
async fn test_start_crawl_posts_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl"))
        .and(body_json(json!({"urls": ["https://example.com"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("job-1", "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .start_crawl(&["https://example.com".to_string()])
        .await;

    assert!(response.success, "unexpected error: {:?}", response.error);
    let job = response.data.unwrap();
    assert_eq!(job.id, "job-1");
    assert_eq!(job.status, JobStatus::Pending);
}

#[tokio::test]
async fn test_get_crawl_jobs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            job_json("a", "running"),
            job_json("b", "completed")
        ])))
        .mount(&server)
        .await;

    let jobs = client_for(&server).get_crawl_jobs().await.into_result().unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[1].status, JobStatus::Completed);
}

#[tokio::test]
async fn test_non_2xx_maps_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/crawl/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = client_for(&server).get_crawl_job("missing").await;
    assert!(!response.success);
    assert_eq!(response.data, None);
    assert_eq!(response.error.as_deref(), Some("HTTP 404: Not Found"));

    let err = response.into_result().unwrap_err();
    assert!(matches!(err, CrawlError::Transport(ref m) if m == "HTTP 404: Not Found"));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = client_for(&server).health_check().await;
    assert_eq!(
        response.error.as_deref(),
        Some("HTTP 500: Internal Server Error")
    );
}

#[tokio::test]
async fn test_undecodable_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let response = client_for(&server).health_check().await;
    assert!(!response.success);
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_unreachable_backend_is_an_error() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    drop(server);

    let response = client.health_check().await;
    assert!(!response.success);
    assert!(response.error.is_some());
}

#[tokio::test]
async fn test_stop_crawl_ignores_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/crawl/job-7/stop"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).stop_crawl("job-7").await;
    assert!(response.success);
    assert_eq!(response.data, Some(()));
}

#[tokio::test]
async fn test_validate_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"url": "https://example.com", "isValid": true, "status": 200, "responseTime": 85},
            {"url": "https://down.example", "isValid": false, "error": "ECONNREFUSED"}
        ])))
        .mount(&server)
        .await;

    let urls = vec![
        "https://example.com".to_string(),
        "https://down.example".to_string(),
    ];
    let results = client_for(&server)
        .validate_urls(&urls)
        .await
        .into_result()
        .unwrap();

    assert!(results[0].is_valid);
    assert_eq!(results[0].status, Some(200));
    assert_eq!(results[0].response_time, Some(85));
    assert!(!results[1].is_valid);
    assert_eq!(results[1].error.as_deref(), Some("ECONNREFUSED"));
}

#[tokio::test]
async fn test_export_returns_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/export"))
        .and(body_json(json!({"format": "csv", "jobId": "job-3"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"url,status\n".to_vec()))
        .mount(&server)
        .await;

    let options = ExportOptions {
        format: ExportFormat::Csv,
        job_id: "job-3".to_string(),
        filename: None,
    };
    let bytes = client_for(&server)
        .export_results(&options)
        .await
        .into_result()
        .unwrap();
    assert_eq!(bytes, b"url,status\n");
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let health = client_for(&server).health_check().await.into_result().unwrap();
    assert_eq!(health.status, "ok");
}
