//! 基础数据（站点、位置、类别、部门、厂商）的 HTTP 处理器
//!
//! 五张设置表同构，路径参数决定操作哪张表。

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::lookup::{CreateLookupRequest, LookupKind, RenameLookupRequest},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

fn parse_kind(kind: &str) -> Result<LookupKind, AppError> {
    LookupKind::from_path(kind)
        .ok_or_else(|| AppError::not_found(format!("Unknown lookup table '{}'", kind)))
}

/// 列出条目
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;
    let items = state.lookup_repo.list(kind, actor.organisation_id).await?;
    let count = items.len();

    Ok(Json(json!({
        "items": items,
        "count": count
    })))
}

/// 创建条目（仅管理员，由路由层强制）
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(kind): Path<String>,
    Json(req): Json<CreateLookupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }

    let item = state
        .lookup_repo
        .create(kind, actor.organisation_id, name)
        .await?;

    Ok(Json(json!({
        "message": "条目创建成功",
        "item": item
    })))
}

/// 重命名条目（仅管理员，由路由层强制）
pub async fn rename_item(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(req): Json<RenameLookupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }

    let item = state
        .lookup_repo
        .rename(kind, actor.organisation_id, id, name)
        .await?
        .ok_or_else(|| AppError::not_found("Item not found"))?;

    Ok(Json(json!({
        "message": "条目更新成功",
        "item": item
    })))
}

/// 删除条目（仅管理员，由路由层强制）
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    let kind = parse_kind(&kind)?;

    if !state
        .lookup_repo
        .delete(kind, actor.organisation_id, id)
        .await?
    {
        return Err(AppError::not_found("Item not found"));
    }

    Ok(Json(json!({
        "message": "条目删除成功"
    })))
}
