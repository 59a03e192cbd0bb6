//! 健康检查 API 集成测试

use axum::http::StatusCode;
use std::sync::Arc;

mod common;
use common::{body_json, create_test_app, create_test_app_state, get_with_auth, MemoryUserStore};

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _store) = create_test_app();

    let response = get_with_auth(&app, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["uptime_secs"].is_number());
}

#[tokio::test]
async fn test_readiness_endpoint() {
    let (app, _store) = create_test_app();

    let response = get_with_auth(&app, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["checks"][0]["name"], "database");
    assert_eq!(json["checks"][0]["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_unavailable_store() {
    let state = create_test_app_state(Arc::new(MemoryUserStore::unavailable()));
    let app = ymhs_service::routes::create_router(state);

    let response = get_with_auth(&app, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["ready"], false);
    assert_eq!(json["checks"][0]["status"], "unhealthy");
}

#[tokio::test]
async fn test_responses_carry_trace_headers() {
    let (app, _store) = create_test_app();

    let response = get_with_auth(&app, "/health", None).await;
    assert!(response.headers().contains_key("x-trace-id"));
    assert!(response.headers().contains_key("x-request-id"));
}
