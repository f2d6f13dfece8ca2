//! JWT 认证中间件

use crate::{
    auth::jwt::JwtService,
    error::AppError,
    models::user::UserRole,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// 请求操作者上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub organisation_id: Uuid,
}

impl ActorContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 ActorContext
impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActorContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// 从 Authorization 头提取令牌
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(|t| t.to_string()))
        .ok_or(AppError::Unauthorized)
}

/// JWT 认证中间件 - 必须认证
pub async fn jwt_auth_middleware(
    State(jwt_service): State<Arc<JwtService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 从 Authorization 头提取并验证令牌
    let token = extract_token(req.headers())?;
    let claims = jwt_service.validate_access_token(&token)?;

    // 构建操作者上下文
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
    let organisation_id = Uuid::parse_str(&claims.org).map_err(|_| AppError::Unauthorized)?;
    let role = UserRole::parse(&claims.role).ok_or(AppError::Unauthorized)?;

    let actor = ActorContext {
        user_id,
        username: claims.username,
        role,
        organisation_id,
    };

    // 附加到请求扩展
    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

/// 管理员专用中间件，必须在 jwt_auth_middleware 之后挂载
pub async fn require_admin_middleware(req: Request, next: Next) -> Result<Response, AppError> {
    let actor = req
        .extensions()
        .get::<ActorContext>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    if !actor.is_admin() {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
