#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chrono::NaiveDate;
use pulseboard_api::{Activity, ApiClient, Error, ErrorKind, PageQuery};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn metrics_page() -> serde_json::Value {
    json!({
        "data": [{
            "timestamp": "2024-01-01T00:00:00Z",
            "uptime": 97.5,
            "users_connected": 12,
            "activity": "Normal"
        }],
        "pagination": { "page": 1, "pages": 1, "total": 1 }
    })
}

// ── Metrics ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_metrics() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(metrics_page()))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.list_metrics(&PageQuery::new(1, 10)).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].activity, Activity::Normal);
    assert!((page.data[0].uptime - 97.5).abs() < f64::EPSILON);
    assert_eq!(page.pagination.total, 1);
}

#[tokio::test]
async fn test_list_metrics_sends_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics"))
        .and(query_param("page", "3"))
        .and(query_param("start_date", "2024-01-01"))
        .and(query_param("end_date", "2024-01-31"))
        .and(query_param("keyword", "login failed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(metrics_page()))
        .expect(1)
        .mount(&server)
        .await;

    let query = PageQuery {
        page: 3,
        per_page: 10,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        keyword: Some("login failed".into()),
    };
    client.list_metrics(&query).await.unwrap();
}

#[tokio::test]
async fn test_blank_keyword_is_omitted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .and(query_param_is_missing("keyword"))
        .and(query_param_is_missing("start_date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "pagination": { "page": 1, "pages": 0, "total": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = PageQuery::new(1, 10);
    query.keyword = Some("  ".into());
    let page = client.list_notifications(&query).await.unwrap();

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.pages, 0);
}

// ── Summary ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_metrics_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics/summary"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "avg_uptime": 98.25,
            "max_concurrent_users": 49,
            "avg_users": 27.4,
            "suspicious_activities": 3
        })))
        .mount(&server)
        .await;

    let summary = client.metrics_summary(30).await.unwrap();

    assert_eq!(summary.max_concurrent_users, 49);
    assert_eq!(summary.suspicious_activities, 3);
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_notifications_http_date() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "timestamp": "Tue, 02 Jan 2024 10:30:00 GMT",
                "event_type": "Unauthorized Access Attempt",
                "description": "Suspicious activity detected"
            }],
            "pagination": { "page": 1, "pages": 1, "total": 1 }
        })))
        .mount(&server)
        .await;

    let page = client
        .list_notifications(&PageQuery::new(1, 10))
        .await
        .unwrap();

    assert_eq!(page.data[0].event_type, "Unauthorized Access Attempt");
    assert_eq!(
        page.data[0].timestamp.format("%Y-%m-%d %H:%M").to_string(),
        "2024-01-02 10:30"
    );
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_unhealthy_with_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "degraded", "error": "disk full" })),
        )
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();

    assert!(!health.is_healthy());
    assert_eq!(health.error.as_deref(), Some("disk full"));
}

#[tokio::test]
async fn test_health_503_with_body_is_unhealthy() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(json!({ "status": "unhealthy", "error": "db down" })),
        )
        .mount(&server)
        .await;

    let health = client.health().await.unwrap();

    assert_eq!(health.status, "unhealthy");
    assert_eq!(health.error.as_deref(), Some("db down"));
    assert!(!health.is_healthy());
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client.health().await.unwrap_err();

    assert!(
        matches!(err, Error::Http { status: 503, ref body, .. } if body == "maintenance"),
        "expected Http 503, got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::Http);
}

#[tokio::test]
async fn test_malformed_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/metrics/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.metrics_summary(7).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.to_string().contains("oops"), "preview missing: {err}");
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base_url = Url::parse(&format!("http://{addr}")).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);

    let err = client.health().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
}
