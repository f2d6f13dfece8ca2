//! Asset history repository (资产历史数据访问)
//!
//! 历史记录仅追加，写入必须发生在与资产变更相同的事务中。

use crate::{
    error::AppError,
    models::history::{AssetHistory, HistoryListFilters, NewHistoryEntry},
};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub struct HistoryRepository {
    db: PgPool,
}

impl HistoryRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 追加历史记录（事务内）
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        asset_id: Uuid,
        entry: &NewHistoryEntry,
        performed_by: Option<Uuid>,
    ) -> Result<AssetHistory, AppError> {
        let record = sqlx::query_as::<_, AssetHistory>(
            r#"
            INSERT INTO asset_history (asset_id, organisation_id, action, old_value, new_value, details, performed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(asset_id)
        .bind(organisation_id)
        .bind(entry.action.as_str())
        .bind(&entry.old_value)
        .bind(&entry.new_value)
        .bind(&entry.details)
        .bind(performed_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(record)
    }

    /// 列出资产的历史记录，按时间倒序
    pub async fn list(
        &self,
        organisation_id: Uuid,
        asset_id: Uuid,
        filters: &HistoryListFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AssetHistory>, AppError> {
        let mut query = String::from(
            "SELECT * FROM asset_history WHERE asset_id = $1 AND organisation_id = $2",
        );
        let mut index = 2;

        if filters.action.is_some() {
            index += 1;
            query.push_str(&format!(" AND action = ${}", index));
        }
        if filters.from.is_some() {
            index += 1;
            query.push_str(&format!(" AND created_at >= ${}", index));
        }
        if filters.to.is_some() {
            index += 1;
            query.push_str(&format!(" AND created_at <= ${}", index));
        }

        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            index + 1,
            index + 2
        ));

        let mut query_builder = sqlx::query_as::<_, AssetHistory>(&query)
            .bind(asset_id)
            .bind(organisation_id);

        if let Some(action) = &filters.action {
            query_builder = query_builder.bind(action);
        }
        if let Some(from) = &filters.from {
            query_builder = query_builder.bind(from);
        }
        if let Some(to) = &filters.to {
            query_builder = query_builder.bind(to);
        }

        let records = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(records)
    }

    /// 统计资产历史记录数量
    pub async fn count(
        &self,
        organisation_id: Uuid,
        asset_id: Uuid,
        filters: &HistoryListFilters,
    ) -> Result<i64, AppError> {
        let mut query = String::from(
            "SELECT COUNT(*) FROM asset_history WHERE asset_id = $1 AND organisation_id = $2",
        );
        let mut index = 2;

        if filters.action.is_some() {
            index += 1;
            query.push_str(&format!(" AND action = ${}", index));
        }
        if filters.from.is_some() {
            index += 1;
            query.push_str(&format!(" AND created_at >= ${}", index));
        }
        if filters.to.is_some() {
            index += 1;
            query.push_str(&format!(" AND created_at <= ${}", index));
        }

        let mut query_builder = sqlx::query(&query).bind(asset_id).bind(organisation_id);

        if let Some(action) = &filters.action {
            query_builder = query_builder.bind(action);
        }
        if let Some(from) = &filters.from {
            query_builder = query_builder.bind(from);
        }
        if let Some(to) = &filters.to {
            query_builder = query_builder.bind(to);
        }

        let count: i64 = query_builder.fetch_one(&self.db).await?.get(0);
        Ok(count)
    }

    /// 查询执行者显示名（批量渲染历史时使用）
    pub async fn performer_names(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, String)>, AppError> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let rows = sqlx::query(
            "SELECT id, COALESCE(full_name, username) AS name FROM users WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get::<Uuid, _>("id"), r.get::<String, _>("name")))
            .collect())
    }
}
