//! 路由注册
//! 组装服务、创建所有 API 路由并应用中间件

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::AppConfig,
    error::AppError,
    handlers,
    middleware::AppState,
    repository::{
        AccessRepository, AssetRepository, AuthRepository, HistoryRepository, LookupRepository,
        TagRepository, UserRepository,
    },
    services::{AccessService, AssetService, AuthService, HistoryService, TagService},
};

/// 组装应用状态（服务与仓储）
pub fn build_state(config: AppConfig, db: sqlx::PgPool) -> Result<Arc<AppState>, AppError> {
    let jwt_service = Arc::new(JwtService::from_config(&config)?);

    let asset_repo = Arc::new(AssetRepository::new(db.clone()));
    let history_repo = Arc::new(HistoryRepository::new(db.clone()));
    let tag_repo = Arc::new(TagRepository::new(db.clone()));
    let access_repo = Arc::new(AccessRepository::new(db.clone()));
    let lookup_repo = Arc::new(LookupRepository::new(db.clone()));
    let user_repo = Arc::new(UserRepository::new(db.clone()));
    let auth_repo = Arc::new(AuthRepository::new(db.clone()));

    let tag_service = Arc::new(TagService::new(tag_repo, config.assets.clone()));
    let asset_service = Arc::new(AssetService::new(
        asset_repo,
        history_repo.clone(),
        lookup_repo.clone(),
        tag_service.clone(),
    ));
    let history_service = Arc::new(HistoryService::new(history_repo));
    let access_service = Arc::new(AccessService::new(access_repo));
    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        auth_repo,
        jwt_service.clone(),
        config.security.clone(),
    ));

    Ok(Arc::new(AppState {
        config,
        db,
        jwt_service,
        auth_service,
        asset_service,
        history_service,
        tag_service,
        access_service,
        lookup_repo,
        user_repo,
    }))
}

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let jwt_service = state.jwt_service.clone();

    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需认证）
    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        // 当前用户
        .route("/api/v1/auth/me", get(handlers::user::get_current_user))
        .route("/api/v1/auth/logout", post(handlers::auth::logout))
        .route("/api/v1/users/me/password", put(handlers::user::change_password))
        .route("/api/v1/users", get(handlers::user::list_users))

        // 资产
        .route(
            "/api/v1/assets",
            get(handlers::asset::list_assets).post(handlers::asset::create_asset),
        )
        .route(
            "/api/v1/assets/{id}",
            get(handlers::asset::get_asset)
                .put(handlers::asset::update_asset)
                .delete(handlers::asset::delete_asset),
        )
        .route("/api/v1/assets/{id}/replicate", post(handlers::asset::replicate_asset))
        .route("/api/v1/assets/{id}/check-out", post(handlers::asset::check_out_asset))
        .route("/api/v1/assets/{id}/check-in", post(handlers::asset::check_in_asset))
        .route("/api/v1/assets/{id}/mark-broken", post(handlers::asset::mark_as_broken))
        .route("/api/v1/assets/{id}/send-repair", post(handlers::asset::send_for_repair))
        .route("/api/v1/assets/{id}/complete-repair", post(handlers::asset::complete_repair))
        .route("/api/v1/assets/{id}/status", post(handlers::asset::change_status))
        .route("/api/v1/assets/bulk-status", post(handlers::asset::bulk_change_status))
        .route("/api/v1/assets/{id}/repairs", get(handlers::asset::list_repairs))
        .route("/api/v1/assets/{id}/history", get(handlers::history::list_history))

        // 标签
        .route("/api/v1/tags/next", get(handlers::tag::preview_next_tag))
        .route("/api/v1/tag-formats", get(handlers::tag::list_tag_formats))

        // 访问门禁
        .route("/api/v1/access/check", get(handlers::access::check_access))
        .route("/api/v1/access/check-batch", post(handlers::access::check_access_batch))

        // 基础数据（只读）
        .route("/api/v1/lookups/{kind}", get(handlers::lookup::list_items))

        // 用户偏好
        .route("/api/v1/preferences", get(handlers::preference::list_preferences))
        .route(
            "/api/v1/preferences/{key}",
            get(handlers::preference::get_preference)
                .put(handlers::preference::set_preference)
                .delete(handlers::preference::delete_preference),
        );

    // 仅管理员的管理路由
    let admin_routes = Router::new()
        .route("/api/v1/users", post(handlers::user::create_user))
        .route("/api/v1/users/{id}", put(handlers::user::update_user))
        .route(
            "/api/v1/tag-formats",
            post(handlers::tag::upsert_tag_format),
        )
        .route("/api/v1/tag-formats/{id}", axum::routing::delete(handlers::tag::delete_tag_format))
        .route(
            "/api/v1/access/rules",
            get(handlers::access::list_access_rules).post(handlers::access::upsert_access_rule),
        )
        .route(
            "/api/v1/access/rules/{id}",
            axum::routing::delete(handlers::access::delete_access_rule),
        )
        .route("/api/v1/lookups/{kind}", post(handlers::lookup::create_item))
        .route(
            "/api/v1/lookups/{kind}/{id}",
            put(handlers::lookup::rename_item).delete(handlers::lookup::delete_item),
        )
        .layer(axum::middleware::from_fn(
            crate::auth::middleware::require_admin_middleware,
        ));

    let authenticated_routes = authenticated_routes.merge(admin_routes).layer(
        axum::middleware::from_fn_with_state(
            jwt_service,
            crate::auth::middleware::jwt_auth_middleware,
        ),
    );

    // 指标端点
    let metrics_routes = Router::new().route("/metrics", get(handlers::metrics::metrics_export));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(authenticated_routes)
        .merge(metrics_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::ip_whitelist_middleware,
        ))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
