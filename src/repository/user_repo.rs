//! User repository (用户数据访问)

use crate::{
    error::AppError,
    models::{
        preference::UserPreference,
        user::{UpdateUserRequest, User},
    },
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ==================== Users ====================

    /// 创建用户
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        organisation_id: Uuid,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
        role: &str,
        full_name: Option<&str>,
        created_by: Option<Uuid>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (organisation_id, username, email, password_hash, role, full_name, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(organisation_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(full_name)
        .bind(created_by)
        .fetch_one(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据 ID 获取用户
    pub async fn get(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据用户名获取用户
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 列出组织的用户
    pub async fn list(&self, organisation_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE organisation_id = $1 ORDER BY username",
        )
        .bind(organisation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// 更新用户信息
    pub async fn update(
        &self,
        organisation_id: Uuid,
        id: Uuid,
        req: &UpdateUserRequest,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                email = COALESCE($3, email),
                full_name = COALESCE($4, full_name),
                role = COALESCE($5, role),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1 AND organisation_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(organisation_id)
        .bind(&req.email)
        .bind(&req.full_name)
        .bind(&req.role)
        .bind(&req.status)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 更新密码哈希
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    // ==================== Preferences ====================

    /// 获取单个偏好
    pub async fn get_preference(
        &self,
        user_id: Uuid,
        key: &str,
    ) -> Result<Option<UserPreference>, AppError> {
        let pref = sqlx::query_as::<_, UserPreference>(
            "SELECT * FROM user_preferences WHERE user_id = $1 AND pref_key = $2",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.db)
        .await?;

        Ok(pref)
    }

    /// 列出用户的全部偏好
    pub async fn list_preferences(&self, user_id: Uuid) -> Result<Vec<UserPreference>, AppError> {
        let prefs = sqlx::query_as::<_, UserPreference>(
            "SELECT * FROM user_preferences WHERE user_id = $1 ORDER BY pref_key",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(prefs)
    }

    /// 写入偏好（整体替换）
    pub async fn set_preference(
        &self,
        user_id: Uuid,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<UserPreference, AppError> {
        let pref = sqlx::query_as::<_, UserPreference>(
            r#"
            INSERT INTO user_preferences (user_id, pref_key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, pref_key)
            DO UPDATE SET value = $3, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .fetch_one(&self.db)
        .await?;

        Ok(pref)
    }

    /// 删除偏好
    pub async fn delete_preference(&self, user_id: Uuid, key: &str) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM user_preferences WHERE user_id = $1 AND pref_key = $2")
                .bind(user_id)
                .bind(key)
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
