//! 用户偏好的 HTTP 处理器
//!
//! 偏好值是客户端自有的不透明 JSON，服务端整体读写不做解释。

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::preference::SetPreferenceRequest,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 列出当前用户的全部偏好
pub async fn list_preferences(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
) -> Result<impl IntoResponse, AppError> {
    let prefs = state.user_repo.list_preferences(actor.user_id).await?;
    let count = prefs.len();

    Ok(Json(json!({
        "preferences": prefs,
        "count": count
    })))
}

/// 获取单个偏好
pub async fn get_preference(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let pref = state
        .user_repo
        .get_preference(actor.user_id, &key)
        .await?
        .ok_or_else(|| AppError::not_found("Preference not found"))?;

    Ok(Json(pref))
}

/// 写入偏好（整体替换）
pub async fn set_preference(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(key): Path<String>,
    Json(req): Json<SetPreferenceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if key.trim().is_empty() {
        return Err(AppError::validation("Preference key must not be empty"));
    }

    let pref = state
        .user_repo
        .set_preference(actor.user_id, &key, &req.value)
        .await?;

    Ok(Json(json!({
        "message": "偏好保存成功",
        "preference": pref
    })))
}

/// 删除偏好
pub async fn delete_preference(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.user_repo.delete_preference(actor.user_id, &key).await? {
        return Err(AppError::not_found("Preference not found"));
    }

    Ok(Json(json!({
        "message": "偏好删除成功"
    })))
}
