//! 用户管理的 HTTP 处理器

use crate::{
    auth::ActorContext,
    error::AppError,
    middleware::AppState,
    models::user::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, UserResponse},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 列出组织内的用户
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list(actor.organisation_id).await?;
    let users: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    let count = users.len();

    Ok(Json(json!({
        "users": users,
        "count": count
    })))
}

/// 创建用户（仅管理员，由路由层强制）
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state
        .auth_service
        .create_user(actor.organisation_id, &req, actor.user_id)
        .await?;

    Ok(Json(json!({
        "message": "用户创建成功",
        "user": user
    })))
}

/// 获取当前用户信息
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .get(actor.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(user)))
}

/// 更新用户（仅管理员，由路由层强制）
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let user = state
        .user_repo
        .update(actor.organisation_id, id, &req)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({
        "message": "用户更新成功",
        "user": UserResponse::from(user)
    })))
}

/// 修改自己的密码
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    actor: ActorContext,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .auth_service
        .change_password(actor.user_id, &req)
        .await?;

    Ok(Json(json!({
        "message": "密码修改成功，请重新登录"
    })))
}
