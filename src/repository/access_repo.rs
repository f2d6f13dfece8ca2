//! Page access repository (页面访问规则数据访问)

use crate::{error::AppError, models::access::PageAccess};
use sqlx::PgPool;
use uuid::Uuid;

pub struct AccessRepository {
    db: PgPool,
}

impl AccessRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 查找某条路由的访问规则
    pub async fn find_rule(
        &self,
        organisation_id: Uuid,
        route: &str,
    ) -> Result<Option<PageAccess>, AppError> {
        let rule = sqlx::query_as::<_, PageAccess>(
            "SELECT * FROM page_access WHERE organisation_id = $1 AND route = $2",
        )
        .bind(organisation_id)
        .bind(route)
        .fetch_optional(&self.db)
        .await?;

        Ok(rule)
    }

    /// 列出组织的全部访问规则
    pub async fn list_rules(&self, organisation_id: Uuid) -> Result<Vec<PageAccess>, AppError> {
        let rules = sqlx::query_as::<_, PageAccess>(
            "SELECT * FROM page_access WHERE organisation_id = $1 ORDER BY route",
        )
        .bind(organisation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rules)
    }

    /// 创建或更新访问规则
    pub async fn upsert_rule(
        &self,
        organisation_id: Uuid,
        route: &str,
        allowed: bool,
    ) -> Result<PageAccess, AppError> {
        let rule = sqlx::query_as::<_, PageAccess>(
            r#"
            INSERT INTO page_access (organisation_id, route, allowed)
            VALUES ($1, $2, $3)
            ON CONFLICT (organisation_id, route)
            DO UPDATE SET allowed = $3, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(organisation_id)
        .bind(route)
        .bind(allowed)
        .fetch_one(&self.db)
        .await?;

        Ok(rule)
    }

    /// 删除访问规则
    pub async fn delete_rule(&self, organisation_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM page_access WHERE id = $1 AND organisation_id = $2")
            .bind(id)
            .bind(organisation_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
