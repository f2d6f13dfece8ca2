//! Refresh token repository (刷新令牌数据访问)
//!
//! 只存储令牌的 SHA-256 哈希，原始令牌不落库。

use crate::{error::AppError, models::auth::RefreshToken};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct AuthRepository {
    db: PgPool,
}

impl AuthRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 存储刷新令牌哈希
    pub async fn insert_refresh_token(
        &self,
        id: Uuid,
        token_hash: &str,
        user_id: Uuid,
        user_agent: Option<&str>,
        ip_address: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        let token = sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (id, token_hash, user_id, user_agent, ip_address, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(token_hash)
        .bind(user_id)
        .bind(user_agent)
        .bind(ip_address)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await?;

        Ok(token)
    }

    /// 根据哈希查找刷新令牌
    pub async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, AppError> {
        let token = sqlx::query_as::<_, RefreshToken>(
            "SELECT * FROM refresh_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.db)
        .await?;

        Ok(token)
    }

    /// 吊销令牌，可同时记录轮换后的新令牌 ID
    pub async fn revoke(&self, id: Uuid, replaced_by: Option<Uuid>) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), replaced_by = $2 WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .bind(replaced_by)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// 吊销用户的全部有效令牌
    pub async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// 清理过期令牌
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
