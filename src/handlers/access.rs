//! 页面访问门禁的 HTTP 处理器

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::access::{
        AccessCheckQuery, AccessDecision, BatchAccessRequest, BatchAccessResponse,
        UpsertAccessRequest,
    },
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// 判定单条路由的访问权限
pub async fn check_access(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Query(query): Query<AccessCheckQuery>,
) -> Result<impl IntoResponse, AppError> {
    let allowed = state.access_service.check(&actor, &query.route).await?;

    Ok(Json(AccessDecision {
        route: query.route,
        allowed,
    }))
}

/// 批量判定路由访问权限
pub async fn check_access_batch(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<BatchAccessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let results = state.access_service.check_batch(&actor, &req.routes).await;

    Ok(Json(BatchAccessResponse { results }))
}

/// 列出组织的访问规则（仅管理员，由路由层强制）
pub async fn list_access_rules(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
) -> Result<impl IntoResponse, AppError> {
    let rules = state
        .access_service
        .list_rules(actor.organisation_id)
        .await?;
    let count = rules.len();

    Ok(Json(json!({
        "rules": rules,
        "count": count
    })))
}

/// 创建或更新访问规则（仅管理员，由路由层强制）
pub async fn upsert_access_rule(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<UpsertAccessRequest>,
) -> Result<impl IntoResponse, AppError> {
    let rule = state
        .access_service
        .upsert_rule(actor.organisation_id, &req.route, req.allowed)
        .await?;

    Ok(Json(json!({
        "message": "访问规则保存成功",
        "rule": rule
    })))
}

/// 删除访问规则（仅管理员，由路由层强制）
pub async fn delete_access_rule(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state
        .access_service
        .delete_rule(actor.organisation_id, id)
        .await?;

    Ok(Json(json!({
        "message": "访问规则删除成功"
    })))
}
