//! Lookup table repository (基础数据访问)
//!
//! 五张同构的设置表（站点、位置、类别、部门、厂商）共用一套查询，
//! 表名只能来自 LookupKind 的固定集合。

use crate::{
    error::AppError,
    models::lookup::{LookupItem, LookupKind},
};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub struct LookupRepository {
    db: PgPool,
}

impl LookupRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 列出组织的全部条目
    pub async fn list(
        &self,
        kind: LookupKind,
        organisation_id: Uuid,
    ) -> Result<Vec<LookupItem>, AppError> {
        let query = format!(
            "SELECT * FROM {} WHERE organisation_id = $1 ORDER BY name",
            kind.table()
        );

        let items = sqlx::query_as::<_, LookupItem>(&query)
            .bind(organisation_id)
            .fetch_all(&self.db)
            .await?;

        Ok(items)
    }

    /// 获取单个条目
    pub async fn get(
        &self,
        kind: LookupKind,
        organisation_id: Uuid,
        id: Uuid,
    ) -> Result<Option<LookupItem>, AppError> {
        let query = format!(
            "SELECT * FROM {} WHERE id = $1 AND organisation_id = $2",
            kind.table()
        );

        let item = sqlx::query_as::<_, LookupItem>(&query)
            .bind(id)
            .bind(organisation_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(item)
    }

    /// 创建条目
    pub async fn create(
        &self,
        kind: LookupKind,
        organisation_id: Uuid,
        name: &str,
    ) -> Result<LookupItem, AppError> {
        let query = format!(
            "INSERT INTO {} (organisation_id, name) VALUES ($1, $2) RETURNING *",
            kind.table()
        );

        let item = sqlx::query_as::<_, LookupItem>(&query)
            .bind(organisation_id)
            .bind(name)
            .fetch_one(&self.db)
            .await?;

        Ok(item)
    }

    /// 重命名条目
    pub async fn rename(
        &self,
        kind: LookupKind,
        organisation_id: Uuid,
        id: Uuid,
        name: &str,
    ) -> Result<Option<LookupItem>, AppError> {
        let query = format!(
            "UPDATE {} SET name = $3 WHERE id = $1 AND organisation_id = $2 RETURNING *",
            kind.table()
        );

        let item = sqlx::query_as::<_, LookupItem>(&query)
            .bind(id)
            .bind(organisation_id)
            .bind(name)
            .fetch_optional(&self.db)
            .await?;

        Ok(item)
    }

    /// 删除条目
    pub async fn delete(
        &self,
        kind: LookupKind,
        organisation_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError> {
        let query = format!(
            "DELETE FROM {} WHERE id = $1 AND organisation_id = $2",
            kind.table()
        );

        let result = sqlx::query(&query)
            .bind(id)
            .bind(organisation_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 按 ID 查询名称，缺失时返回 None
    pub async fn name_of(
        &self,
        kind: LookupKind,
        id: Option<Uuid>,
    ) -> Result<Option<String>, AppError> {
        let Some(id) = id else { return Ok(None) };

        let query = format!("SELECT name FROM {} WHERE id = $1", kind.table());

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.db).await?;

        Ok(row.map(|r| r.get("name")))
    }
}
