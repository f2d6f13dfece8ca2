//! 错误处理单元测试
//!
//! 测试应用错误类型的各种行为

use axum::http::StatusCode;
use helpdesk_system::error::AppError;

// ==================== 错误状态码测试 ====================

#[test]
fn test_error_status_codes() {
    assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        AppError::Authentication("test".to_string()).status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(AppError::NotFound("resource".to_string()).status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        AppError::BadRequest("invalid".to_string()).status_code(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(AppError::Validation("error".to_string()).status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::RateLimitExceeded.status_code(), StatusCode::TOO_MANY_REQUESTS);
}

#[test]
fn test_invalid_transition_maps_to_conflict() {
    // 生命周期冲突用 409 表达，让前端区分于普通参数错误
    let error = AppError::InvalidTransition("Cannot check out".to_string());
    assert_eq!(error.status_code(), StatusCode::CONFLICT);
    assert_eq!(error.code(), 409);
}

#[test]
fn test_database_error_status_code() {
    let db_error = sqlx::Error::RowNotFound;
    let app_error = AppError::Database(db_error);
    assert_eq!(app_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_config_error_status_code() {
    let app_error = AppError::Config("Invalid config".to_string());
    assert_eq!(app_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_internal_error_status_code() {
    let app_error = AppError::Internal("Something went wrong".to_string());
    assert_eq!(app_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ==================== 用户消息测试 ====================

#[test]
fn test_user_messages_no_sensitive_info() {
    // 数据库错误不应该暴露技术细节
    let db_error = AppError::Database(sqlx::Error::RowNotFound);
    let message = db_error.user_message();
    assert_eq!(message, "Database error occurred");
    assert!(!message.to_lowercase().contains("sqlx"));
    assert!(!message.to_lowercase().contains("row"));

    let config_error = AppError::Config("DATABASE_URL=postgres://secret".to_string());
    let message = config_error.user_message();
    assert_eq!(message, "Configuration error");
    assert!(!message.contains("postgres"));

    let internal = AppError::Internal("stack trace here".to_string());
    assert_eq!(internal.user_message(), "Internal server error");
}

#[test]
fn test_user_messages_pass_through_client_errors() {
    // 客户端错误的消息要原样传回，否则用户不知道哪里错了
    let validation = AppError::Validation("Asset tag must not be empty".to_string());
    assert_eq!(validation.user_message(), "Asset tag must not be empty");

    let transition = AppError::InvalidTransition(
        "Cannot check out asset in status 'in_use', must be 'available'".to_string(),
    );
    assert!(transition.user_message().contains("in_use"));

    let not_found = AppError::NotFound("Asset".to_string());
    assert_eq!(not_found.user_message(), "Resource not found: Asset");
}

// ==================== 便捷构造器测试 ====================

#[test]
fn test_convenience_constructors() {
    assert!(matches!(AppError::not_found("Asset"), AppError::NotFound(_)));
    assert!(matches!(AppError::validation("bad"), AppError::Validation(_)));
    assert!(matches!(
        AppError::authentication("Invalid username or password"),
        AppError::Authentication(_)
    ));
    assert!(matches!(AppError::internal_error("boom"), AppError::Internal(_)));
    assert!(matches!(
        AppError::invalid_transition(format!("from '{}'", "disposed")),
        AppError::InvalidTransition(_)
    ));
}

// ==================== 转换测试 ====================

#[test]
fn test_from_sqlx_error() {
    let app_error: AppError = sqlx::Error::RowNotFound.into();
    assert!(matches!(app_error, AppError::Database(_)));
}

#[test]
fn test_from_string() {
    let app_error: AppError = "missing value".to_string().into();
    assert!(matches!(app_error, AppError::Config(_)));
}

#[test]
fn test_from_validation_errors() {
    use validator::Validate;

    #[derive(Validate)]
    struct NameForm {
        #[validate(length(min = 3))]
        name: String,
    }

    let errors = NameForm {
        name: "ab".to_string(),
    }
    .validate()
    .unwrap_err();

    let app_error: AppError = errors.into();
    assert!(matches!(app_error, AppError::Validation(_)));
    assert_eq!(app_error.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_error_display() {
    let error = AppError::NotFound("Asset".to_string());
    assert_eq!(error.to_string(), "Resource not found: Asset");

    let error = AppError::InvalidTransition("already disposed".to_string());
    assert_eq!(error.to_string(), "Invalid lifecycle transition: already disposed");
}
