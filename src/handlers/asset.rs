//! 资产管理的 HTTP 处理器

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::{asset::*, repair::CompleteRepairRequest},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出资产
pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Query(filters): Query<AssetListFilters>,
) -> Result<impl IntoResponse, AppError> {
    let (assets, total) = state.asset_service.list(&actor, &filters).await?;

    Ok(Json(json!({
        "assets": assets,
        "total": total
    })))
}

/// 创建资产
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<CreateAssetRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let asset = state.asset_service.create(&actor, &req).await?;

    Ok(Json(json!({
        "message": "资产创建成功",
        "asset": asset
    })))
}

/// 获取资产详情
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state.asset_service.get(&actor, id).await?;
    Ok(Json(asset))
}

/// 更新资产
pub async fn update_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAssetRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let asset = state.asset_service.update(&actor, id, &req).await?;

    Ok(Json(json!({
        "message": "资产更新成功",
        "asset": asset
    })))
}

/// 删除资产（软删除）
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.asset_service.delete(&actor, id).await?;

    Ok(Json(json!({
        "message": "资产删除成功"
    })))
}

/// 复制资产
pub async fn replicate_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state.asset_service.replicate(&actor, id).await?;

    Ok(Json(json!({
        "message": "资产复制成功",
        "asset": asset
    })))
}

// ==================== Lifecycle ====================

/// 借出资产
pub async fn check_out_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<CheckOutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state.asset_service.check_out(&actor, id, &req).await?;

    Ok(Json(json!({
        "message": "资产借出成功",
        "asset": asset
    })))
}

/// 归还资产
pub async fn check_in_asset(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<CheckInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state.asset_service.check_in(&actor, id, &req).await?;

    Ok(Json(json!({
        "message": "资产归还成功",
        "asset": asset
    })))
}

/// 标记遗失/损坏
pub async fn mark_as_broken(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<MarkBrokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let asset = state.asset_service.mark_as_broken(&actor, id, &req).await?;

    Ok(Json(json!({
        "message": "资产已标记为遗失",
        "asset": asset
    })))
}

/// 送修
pub async fn send_for_repair(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<RepairRequestBody>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let asset = state
        .asset_service
        .send_for_repair(&actor, id, &req)
        .await?;

    Ok(Json(json!({
        "message": "资产已送修",
        "asset": asset
    })))
}

/// 完成维修
pub async fn complete_repair(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteRepairRequest>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state
        .asset_service
        .complete_repair(&actor, id, &req)
        .await?;

    Ok(Json(json!({
        "message": "维修完成",
        "asset": asset
    })))
}

/// 变更状态
pub async fn change_status(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let asset = state.asset_service.change_status(&actor, id, &req).await?;

    Ok(Json(json!({
        "message": "状态变更成功",
        "asset": asset
    })))
}

/// 批量变更状态
pub async fn bulk_change_status(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<BulkStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.asset_service.bulk_change_status(&actor, &req).await?;

    Ok(Json(json!({
        "message": "批量状态变更完成",
        "outcome": outcome
    })))
}

/// 列出资产的维修记录
pub async fn list_repairs(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let repairs = state.asset_service.list_repairs(&actor, id).await?;
    let count = repairs.len();

    Ok(Json(json!({
        "repairs": repairs,
        "count": count
    })))
}
