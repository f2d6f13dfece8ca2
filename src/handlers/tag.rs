//! 标签格式与标签预览的 HTTP 处理器

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::tag::UpsertTagFormatRequest,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub category_id: Option<Uuid>,
}

/// 预览下一个将被分配的标签（不消耗编号）
pub async fn preview_next_tag(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, AppError> {
    let preview = state
        .tag_service
        .preview(actor.organisation_id, query.category_id)
        .await?;

    Ok(Json(preview))
}

/// 列出标签格式
pub async fn list_tag_formats(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
) -> Result<impl IntoResponse, AppError> {
    let formats = state.tag_service.list_formats(actor.organisation_id).await?;
    let count = formats.len();

    Ok(Json(json!({
        "formats": formats,
        "count": count
    })))
}

/// 创建或更新标签格式（仅管理员，由路由层强制）
pub async fn upsert_tag_format(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<UpsertTagFormatRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let format = state
        .tag_service
        .upsert_format(actor.organisation_id, &req)
        .await?;

    Ok(Json(json!({
        "message": "标签格式保存成功",
        "format": format
    })))
}

/// 删除标签格式（仅管理员，由路由层强制）
pub async fn delete_tag_format(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    axum::extract::Path(id): axum::extract::Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !state
        .tag_service
        .delete_format(actor.organisation_id, id)
        .await?
    {
        return Err(AppError::not_found("Tag format not found"));
    }

    Ok(Json(json!({
        "message": "标签格式删除成功"
    })))
}
