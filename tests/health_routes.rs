//! Contract tests for the health and manual trigger routes

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use finalize_cron::routes::create_router;
use finalize_cron::{AppState, FinalizeClient};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{config_for, refused_base_url};

fn build_app(base_url: &str) -> Router {
    let config = Arc::new(config_for(base_url, Duration::from_secs(5)));
    let client = FinalizeClient::new(&config).unwrap();
    create_router(AppState::new(config, client))
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, headers, value)
}

/// GET /api/health answers even when the remote endpoint is down
#[tokio::test]
async fn test_health_independent_of_remote() {
    let base_url = refused_base_url();
    let (status, _, body) = send(build_app(&base_url), "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "guess-game-cron");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["config"]["apiUrl"], base_url);
    assert_eq!(body["config"]["hasCronSecret"], true);
    assert_eq!(body["config"]["interval"], "60 seconds");
    assert!(body.get("uptime").is_none());
}

/// Both route prefixes resolve to the same handlers
#[tokio::test]
async fn test_health_alias_prefix() {
    let base_url = refused_base_url();
    let (status, _, body) = send(build_app(&base_url), "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["config"]["apiUrl"], base_url);
}

/// GET /api/health/detailed adds uptime
#[tokio::test]
async fn test_detailed_reports_uptime() {
    for uri in ["/api/health/detailed", "/health/detailed"] {
        let (status, _, body) = send(build_app(&refused_base_url()), "GET", uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["config"].is_object());
    }
}

/// Health responses are never cached and carry the security headers and a request id
#[tokio::test]
async fn test_response_headers() {
    let (_, headers, _) = send(build_app(&refused_base_url()), "GET", "/api/health").await;

    assert_eq!(headers["cache-control"], "no-store");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert!(headers.contains_key("x-request-id"));
}

/// Missing cron secret is reported, not hidden
#[tokio::test]
async fn test_health_without_secret() {
    let mut config = config_for(&refused_base_url(), Duration::from_secs(5));
    config.cron_secret.clear();
    let config = Arc::new(config);
    let client = FinalizeClient::new(&config).unwrap();
    let app = create_router(AppState::new(config, client));

    let (_, _, body) = send(app, "GET", "/api/health").await;
    assert_eq!(body["config"]["hasCronSecret"], false);
}

/// POST /api/health/trigger embeds the remote response in `result`
#[tokio::test]
async fn test_trigger_against_healthy_remote() {
    let mock_server = MockServer::start().await;
    let remote = json!({
        "success": true,
        "message": "Round finalized",
        "winner": {"ticketId": "t-1", "userId": "u1", "score": 42}
    });

    Mock::given(method("POST"))
        .and(path("/api/game/finalize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, _, body) =
        send(build_app(&mock_server.uri()), "POST", "/api/health/trigger").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Manual trigger completed");
    assert_eq!(body["outcome"]["kind"], "success");
    assert_eq!(body["result"]["success"], true);
    assert_eq!(body["result"]["message"], "Round finalized");
    assert_eq!(body["result"]["winner"]["userId"], "u1");
    assert_eq!(body["result"]["winner"]["ticketId"], "t-1");
    assert_eq!(body["result"]["winner"]["score"].as_f64(), Some(42.0));
}

/// A remote application failure still completes the trigger with 200
#[tokio::test]
async fn test_trigger_with_app_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/game/finalize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "no ticket"})),
        )
        .mount(&mock_server)
        .await;

    let (status, _, body) = send(build_app(&mock_server.uri()), "POST", "/health/trigger").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["outcome"]["kind"], "app_failure");
    assert_eq!(body["outcome"]["detail"], "no ticket");
    assert_eq!(body["result"]["error"], "no ticket");
}

/// A network failure is an outcome, not a server error
#[tokio::test]
async fn test_trigger_with_unreachable_remote() {
    let (status, _, body) =
        send(build_app(&refused_base_url()), "POST", "/api/health/trigger").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["outcome"]["kind"], "connection_refused");
    assert!(body.get("result").is_none());
}

/// The trigger route only accepts POST
#[tokio::test]
async fn test_trigger_requires_post() {
    let (status, _, _) = send(build_app(&refused_base_url()), "GET", "/api/health/trigger").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
