//! 资产历史的 HTTP 处理器

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::history::HistoryListFilters,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// 查询资产历史
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Query(filters): Query<HistoryListFilters>,
) -> Result<impl IntoResponse, AppError> {
    let page_size = filters
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = filters.page.unwrap_or(1).max(1);
    let offset = (page - 1) * page_size;

    let (entries, total) = state
        .history_service
        .list(actor.organisation_id, id, &filters, page_size, offset)
        .await?;

    Ok(Json(json!({
        "history": entries,
        "total": total
    })))
}
