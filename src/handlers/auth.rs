//! 认证相关的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::{get_client_ip, AppState},
    models::auth::{LoginRequest, LogoutRequest, RefreshTokenRequest},
};
use axum::{
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let ip = get_client_ip(&headers, state.config.security.trust_proxy);

    let response = state
        .auth_service
        .login(&req, user_agent.as_deref(), &ip)
        .await?;

    Ok(Json(response))
}

/// 刷新令牌
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let ip = get_client_ip(&headers, state.config.security.trust_proxy);

    let pair = state
        .auth_service
        .refresh(&req.refresh_token, user_agent.as_deref(), &ip)
        .await?;

    Ok(Json(pair))
}

/// 登出
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LogoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&req.refresh_token).await?;

    Ok(Json(json!({
        "message": "登出成功"
    })))
}
