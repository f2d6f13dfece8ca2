//! Asset repository (资产数据访问)
//!
//! 所有变更方法都在调用方提供的事务中执行，
//! 以便资产变更与历史记录写入保持原子性。

use crate::{
    error::AppError,
    models::{asset::*, repair::Repair},
};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub struct AssetRepository {
    db: PgPool,
}

impl AssetRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    // ==================== Assets ====================

    /// 创建资产（事务内）
    pub async fn create_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        asset_tag: &str,
        req: &CreateAssetRequest,
        created_by: Uuid,
    ) -> Result<Asset, AppError> {
        let asset = sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (
                organisation_id, asset_tag, asset_id, name, serial_number, description,
                model, category_id, make_id, department_id, location_id,
                purchase_date, purchase_price, warranty_expiry, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(organisation_id)
        .bind(asset_tag)
        .bind(&req.asset_id)
        .bind(&req.name)
        .bind(&req.serial_number)
        .bind(&req.description)
        .bind(&req.model)
        .bind(req.category_id)
        .bind(req.make_id)
        .bind(req.department_id)
        .bind(req.location_id)
        .bind(req.purchase_date)
        .bind(req.purchase_price)
        .bind(req.warranty_expiry)
        .bind(created_by)
        .fetch_one(&mut **tx)
        .await?;

        Ok(asset)
    }

    /// 获取资产（组织范围内）
    pub async fn get(&self, organisation_id: Uuid, id: Uuid) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE id = $1 AND organisation_id = $2",
        )
        .bind(id)
        .bind(organisation_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(asset)
    }

    /// 事务内获取并锁定资产行
    pub async fn get_for_update_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE id = $1 AND organisation_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(organisation_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(asset)
    }

    /// 根据标签获取资产
    pub async fn get_by_tag(
        &self,
        organisation_id: Uuid,
        asset_tag: &str,
    ) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>(
            "SELECT * FROM assets WHERE asset_tag = $1 AND organisation_id = $2",
        )
        .bind(asset_tag)
        .bind(organisation_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(asset)
    }

    /// 列出资产
    pub async fn list(
        &self,
        organisation_id: Uuid,
        filters: &AssetListFilters,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Asset>, AppError> {
        let mut query = String::from("SELECT * FROM assets WHERE organisation_id = $1");
        let mut index = 1;

        if !filters.include_inactive {
            query.push_str(" AND is_active = TRUE");
        }
        if filters.status.is_some() {
            index += 1;
            query.push_str(&format!(" AND status = ${}", index));
        }
        if filters.category_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND category_id = ${}", index));
        }
        if filters.location_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND location_id = ${}", index));
        }
        if filters.department_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND department_id = ${}", index));
        }
        if filters.search.is_some() {
            index += 1;
            query.push_str(&format!(
                " AND (asset_tag ILIKE ${} OR name ILIKE ${} OR serial_number ILIKE ${})",
                index, index, index
            ));
        }

        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            index + 1,
            index + 2
        ));

        let mut query_builder = sqlx::query_as::<_, Asset>(&query).bind(organisation_id);

        if let Some(status) = &filters.status {
            query_builder = query_builder.bind(status);
        }
        if let Some(category_id) = &filters.category_id {
            query_builder = query_builder.bind(category_id);
        }
        if let Some(location_id) = &filters.location_id {
            query_builder = query_builder.bind(location_id);
        }
        if let Some(department_id) = &filters.department_id {
            query_builder = query_builder.bind(department_id);
        }
        let search_pattern;
        if let Some(search) = &filters.search {
            search_pattern = format!("%{}%", search);
            query_builder = query_builder.bind(&search_pattern);
        }

        let assets = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;

        Ok(assets)
    }

    /// 统计资产数量
    pub async fn count(
        &self,
        organisation_id: Uuid,
        filters: &AssetListFilters,
    ) -> Result<i64, AppError> {
        let mut query = String::from("SELECT COUNT(*) FROM assets WHERE organisation_id = $1");
        let mut index = 1;

        if !filters.include_inactive {
            query.push_str(" AND is_active = TRUE");
        }
        if filters.status.is_some() {
            index += 1;
            query.push_str(&format!(" AND status = ${}", index));
        }
        if filters.category_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND category_id = ${}", index));
        }
        if filters.location_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND location_id = ${}", index));
        }
        if filters.department_id.is_some() {
            index += 1;
            query.push_str(&format!(" AND department_id = ${}", index));
        }
        if filters.search.is_some() {
            index += 1;
            query.push_str(&format!(
                " AND (asset_tag ILIKE ${} OR name ILIKE ${} OR serial_number ILIKE ${})",
                index, index, index
            ));
        }

        let mut query_builder = sqlx::query(&query).bind(organisation_id);

        if let Some(status) = &filters.status {
            query_builder = query_builder.bind(status);
        }
        if let Some(category_id) = &filters.category_id {
            query_builder = query_builder.bind(category_id);
        }
        if let Some(location_id) = &filters.location_id {
            query_builder = query_builder.bind(location_id);
        }
        if let Some(department_id) = &filters.department_id {
            query_builder = query_builder.bind(department_id);
        }
        let search_pattern;
        if let Some(search) = &filters.search {
            search_pattern = format!("%{}%", search);
            query_builder = query_builder.bind(&search_pattern);
        }

        let count: i64 = query_builder.fetch_one(&self.db).await?.get(0);
        Ok(count)
    }

    /// 更新资产字段（事务内）
    pub async fn update_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        id: Uuid,
        req: &UpdateAssetRequest,
    ) -> Result<Option<Asset>, AppError> {
        let asset = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET
                asset_id = COALESCE($3, asset_id),
                name = COALESCE($4, name),
                serial_number = COALESCE($5, serial_number),
                description = COALESCE($6, description),
                model = COALESCE($7, model),
                category_id = COALESCE($8, category_id),
                make_id = COALESCE($9, make_id),
                department_id = COALESCE($10, department_id),
                location_id = COALESCE($11, location_id),
                purchase_date = COALESCE($12, purchase_date),
                purchase_price = COALESCE($13, purchase_price),
                warranty_expiry = COALESCE($14, warranty_expiry),
                updated_at = NOW()
            WHERE id = $1 AND organisation_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(organisation_id)
        .bind(&req.asset_id)
        .bind(&req.name)
        .bind(&req.serial_number)
        .bind(&req.description)
        .bind(&req.model)
        .bind(req.category_id)
        .bind(req.make_id)
        .bind(req.department_id)
        .bind(req.location_id)
        .bind(req.purchase_date)
        .bind(req.purchase_price)
        .bind(req.warranty_expiry)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(asset)
    }

    /// 应用状态转换（事务内）
    ///
    /// 状态与借出字段在同一条语句中更新，中间状态不可见。
    /// clear_assignment 为真时清空全部借出字段。
    #[allow(clippy::too_many_arguments)]
    pub async fn apply_transition_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        id: Uuid,
        new_status: &str,
        clear_assignment: bool,
        checked_out_to: Option<Uuid>,
        assigned_to: Option<&str>,
        checked_out_at: Option<DateTime<Utc>>,
        expected_return_date: Option<chrono::NaiveDate>,
        check_out_notes: Option<&str>,
    ) -> Result<Asset, AppError> {
        let asset = if clear_assignment {
            sqlx::query_as::<_, Asset>(
                r#"
                UPDATE assets
                SET
                    status = $3,
                    assigned_to = NULL,
                    checked_out_to = NULL,
                    checked_out_at = NULL,
                    expected_return_date = NULL,
                    check_out_notes = NULL,
                    updated_at = NOW()
                WHERE id = $1 AND organisation_id = $2
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(organisation_id)
            .bind(new_status)
            .fetch_one(&mut **tx)
            .await?
        } else {
            sqlx::query_as::<_, Asset>(
                r#"
                UPDATE assets
                SET
                    status = $3,
                    assigned_to = COALESCE($4, assigned_to),
                    checked_out_to = COALESCE($5, checked_out_to),
                    checked_out_at = COALESCE($6, checked_out_at),
                    expected_return_date = COALESCE($7, expected_return_date),
                    check_out_notes = COALESCE($8, check_out_notes),
                    updated_at = NOW()
                WHERE id = $1 AND organisation_id = $2
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(organisation_id)
            .bind(new_status)
            .bind(assigned_to)
            .bind(checked_out_to)
            .bind(checked_out_at)
            .bind(expected_return_date)
            .bind(check_out_notes)
            .fetch_one(&mut **tx)
            .await?
        };

        Ok(asset)
    }

    /// 软删除资产（事务内），资产永不物理删除
    pub async fn soft_delete_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        id: Uuid,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE assets SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND organisation_id = $2 AND is_active = TRUE",
        )
        .bind(id)
        .bind(organisation_id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ==================== Repairs ====================

    /// 创建维修记录（事务内）
    pub async fn create_repair_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        asset_id: Uuid,
        issue_description: &str,
        cost: Option<f64>,
        completed_at: Option<DateTime<Utc>>,
        notes: Option<&str>,
    ) -> Result<Repair, AppError> {
        // 创建时已带完成日期的维修记录直接落为 completed
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            INSERT INTO repairs
                (asset_id, organisation_id, issue_description, cost, started_at, completed_at, status, notes)
            VALUES
                ($1, $2, $3, $4, NOW(), $5,
                 CASE WHEN $5::timestamptz IS NULL THEN 'in_progress' ELSE 'completed' END,
                 $6)
            RETURNING *
            "#,
        )
        .bind(asset_id)
        .bind(organisation_id)
        .bind(issue_description)
        .bind(cost)
        .bind(completed_at)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;

        Ok(repair)
    }

    /// 完成进行中的维修记录（事务内）
    pub async fn complete_open_repair_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        asset_id: Uuid,
        cost: Option<f64>,
        notes: Option<&str>,
    ) -> Result<Option<Repair>, AppError> {
        let repair = sqlx::query_as::<_, Repair>(
            r#"
            UPDATE repairs
            SET
                status = 'completed',
                completed_at = NOW(),
                cost = COALESCE($3, cost),
                notes = COALESCE($4, notes)
            WHERE id = (
                SELECT id FROM repairs
                WHERE asset_id = $1 AND organisation_id = $2 AND status = 'in_progress'
                ORDER BY started_at DESC
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(asset_id)
        .bind(organisation_id)
        .bind(cost)
        .bind(notes)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(repair)
    }

    /// 列出资产的维修记录
    pub async fn list_repairs(
        &self,
        organisation_id: Uuid,
        asset_id: Uuid,
    ) -> Result<Vec<Repair>, AppError> {
        let repairs = sqlx::query_as::<_, Repair>(
            "SELECT * FROM repairs WHERE asset_id = $1 AND organisation_id = $2 ORDER BY started_at DESC",
        )
        .bind(asset_id)
        .bind(organisation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(repairs)
    }
}
