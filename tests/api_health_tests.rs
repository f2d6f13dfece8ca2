//! 健康检查 API 集成测试
//!
//! 需要 TEST_DATABASE_URL 指向可用的 Postgres 实例

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serial_test::serial;
use tower::ServiceExt;

mod common;
use common::{create_test_app_state, setup_test_db};

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_health_endpoint() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool);

    let app = helpdesk_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["uptime_secs"].is_number());
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_readiness_endpoint() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool);

    let app = helpdesk_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(json["ready"], true);
    assert!(json["checks"].is_array());
    assert_eq!(json["checks"][0]["name"], "database");
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_protected_route_requires_token() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let state = create_test_app_state(pool);

    let app = helpdesk_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/assets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_assets_accessible_with_valid_token() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = create_test_app_state(pool);

    let token = state
        .jwt_service
        .generate_access_token(&data.user_id, "alice", "user", &data.organisation_id)
        .unwrap();

    let app = helpdesk_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/assets")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[serial]
#[ignore] // 需要数据库
async fn test_admin_route_forbidden_for_regular_user() {
    let config = common::create_test_config();
    let pool = setup_test_db(&config).await;
    let data = common::setup_test_data(&pool).await;
    let state = create_test_app_state(pool);

    let token = state
        .jwt_service
        .generate_access_token(&data.user_id, "alice", "user", &data.organisation_id)
        .unwrap();

    let app = helpdesk_system::routes::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/users")
                .header("Authorization", format!("Bearer {}", token))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "bob",
                        "password": "ValidPass1",
                        "role": "user"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
