//! 资产服务
//!
//! 所有资产变更在单个数据库事务内完成：资产行更新、维修记录
//! 与历史追加要么全部落库要么全部回滚，不存在缺失历史的变更。

use crate::{
    auth::ActorContext,
    error::AppError,
    models::{
        asset::*,
        history::{HistoryAction, NewHistoryEntry},
        lookup::LookupKind,
        repair::{CompleteRepairRequest, Repair},
    },
    repository::{AssetRepository, HistoryRepository, LookupRepository},
    services::{
        lifecycle::{self, LifecycleAction, TransitionPlan},
        tag_allocator::TagService,
    },
};
use chrono::Utc;
use serde_json::json;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 25;
const MAX_PAGE_SIZE: i64 = 100;

pub struct AssetService {
    assets: Arc<AssetRepository>,
    history: Arc<HistoryRepository>,
    lookups: Arc<LookupRepository>,
    tags: Arc<TagService>,
}

impl AssetService {
    pub fn new(
        assets: Arc<AssetRepository>,
        history: Arc<HistoryRepository>,
        lookups: Arc<LookupRepository>,
        tags: Arc<TagService>,
    ) -> Self {
        Self {
            assets,
            history,
            lookups,
            tags,
        }
    }

    // ==================== CRUD ====================

    /// 创建资产，未提供标签时从标签格式分配
    pub async fn create(
        &self,
        actor: &ActorContext,
        req: &CreateAssetRequest,
    ) -> Result<Asset, AppError> {
        let mut tx = self.assets.pool().begin().await?;

        let tag = match &req.asset_tag {
            Some(tag) => {
                let tag = tag.trim();
                if tag.is_empty() {
                    return Err(AppError::validation("Asset tag must not be empty"));
                }
                tag.to_string()
            }
            None => {
                self.tags
                    .allocate_tx(&mut tx, actor.organisation_id, req.category_id)
                    .await?
            }
        };

        let asset = self
            .assets
            .create_tx(&mut tx, actor.organisation_id, &tag, req, actor.user_id)
            .await?;

        let entry = NewHistoryEntry::new(HistoryAction::Created)
            .with_values(None, Some(asset.asset_tag.clone()))
            .with_details(json!({ "name": asset.name }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                asset.id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(asset_id = %asset.id, asset_tag = %asset.asset_tag, "Asset created");
        Ok(asset)
    }

    /// 获取资产并解析基础数据名称
    pub async fn get(&self, actor: &ActorContext, id: Uuid) -> Result<AssetResponse, AppError> {
        let asset = self
            .assets
            .get(actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        self.enrich(asset).await
    }

    /// 列出资产
    pub async fn list(
        &self,
        actor: &ActorContext,
        filters: &AssetListFilters,
    ) -> Result<(Vec<Asset>, i64), AppError> {
        let page_size = filters
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = filters.page.unwrap_or(1).max(1);
        let offset = (page - 1) * page_size;

        let assets = self
            .assets
            .list(actor.organisation_id, filters, page_size, offset)
            .await?;
        let total = self.assets.count(actor.organisation_id, filters).await?;

        Ok((assets, total))
    }

    /// 更新资产字段
    pub async fn update(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &UpdateAssetRequest,
    ) -> Result<Asset, AppError> {
        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .update_tx(&mut tx, actor.organisation_id, id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let entry = NewHistoryEntry::new(HistoryAction::Updated)
            .with_details(update_details(req));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(asset)
    }

    /// 软删除资产，记录保留用于历史追溯
    pub async fn delete(&self, actor: &ActorContext, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        if !self
            .assets
            .soft_delete_tx(&mut tx, actor.organisation_id, id)
            .await?
        {
            return Err(AppError::not_found("Asset not found"));
        }

        let entry = NewHistoryEntry::new(HistoryAction::Deleted)
            .with_values(Some(asset.asset_tag.clone()), None);
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(asset_id = %id, asset_tag = %asset.asset_tag, "Asset soft-deleted");
        Ok(())
    }

    /// 复制资产：新资产获得新分配的标签，借出信息不复制
    pub async fn replicate(&self, actor: &ActorContext, id: Uuid) -> Result<Asset, AppError> {
        let source = self
            .assets
            .get(actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let mut tx = self.assets.pool().begin().await?;

        let tag = self
            .tags
            .allocate_tx(&mut tx, actor.organisation_id, source.category_id)
            .await?;

        let req = CreateAssetRequest {
            asset_tag: None,
            asset_id: source.asset_id.clone(),
            name: source.name.clone(),
            serial_number: None, // 序列号唯一标识单台设备，不随复制
            description: source.description.clone(),
            model: source.model.clone(),
            category_id: source.category_id,
            make_id: source.make_id,
            department_id: source.department_id,
            location_id: source.location_id,
            purchase_date: source.purchase_date,
            purchase_price: source.purchase_price,
            warranty_expiry: source.warranty_expiry,
        };

        let asset = self
            .assets
            .create_tx(&mut tx, actor.organisation_id, &tag, &req, actor.user_id)
            .await?;

        let entry = NewHistoryEntry::new(HistoryAction::Replicated)
            .with_values(None, Some(asset.asset_tag.clone()))
            .with_details(json!({ "source_tag": source.asset_tag }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                asset.id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            source = %source.asset_tag,
            replica = %asset.asset_tag,
            "Asset replicated"
        );
        Ok(asset)
    }

    // ==================== Lifecycle ====================

    /// 借出资产
    pub async fn check_out(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &CheckOutRequest,
    ) -> Result<Asset, AppError> {
        if req.checked_out_to.is_none() && req.assigned_to.is_none() {
            return Err(AppError::validation(
                "Check out requires a user or an assignee name",
            ));
        }

        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let current = parse_status(&asset.status)?;
        let plan = lifecycle::plan(current, LifecycleAction::CheckOut)?;

        let now = Utc::now();
        let updated = self
            .assets
            .apply_transition_tx(
                &mut tx,
                actor.organisation_id,
                id,
                plan.new_status.as_str(),
                plan.clear_assignment,
                req.checked_out_to,
                req.assigned_to.as_deref(),
                Some(now),
                req.expected_return_date,
                req.notes.as_deref(),
            )
            .await?;

        let entry = NewHistoryEntry::new(plan.history_action)
            .with_values(Some(asset.status.clone()), Some(updated.status.clone()))
            .with_details(json!({
                "assigned_to": req.assigned_to,
                "user_id": req.checked_out_to,
                "checked_out_at": now,
                "expected_return_date": req.expected_return_date,
                "notes": req.notes,
            }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// 归还资产
    pub async fn check_in(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &CheckInRequest,
    ) -> Result<Asset, AppError> {
        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let current = parse_status(&asset.status)?;
        let plan = lifecycle::plan(current, LifecycleAction::CheckIn)?;

        let updated = self
            .apply_plan_tx(&mut tx, actor.organisation_id, id, &plan)
            .await?;

        let entry = NewHistoryEntry::new(plan.history_action)
            .with_values(Some(asset.status.clone()), Some(updated.status.clone()))
            .with_details(json!({
                "returned_by": asset.assigned_to,
                "notes": req.notes,
            }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// 标记遗失/损坏：资产转入 lost，借出信息与状态在同一语句内更新
    pub async fn mark_as_broken(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &MarkBrokenRequest,
    ) -> Result<Asset, AppError> {
        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let current = parse_status(&asset.status)?;
        let plan = lifecycle::plan(current, LifecycleAction::MarkAsBroken)?;

        let updated = self
            .apply_plan_tx(&mut tx, actor.organisation_id, id, &plan)
            .await?;

        let entry = NewHistoryEntry::new(plan.history_action)
            .with_values(Some(asset.status.clone()), Some(updated.status.clone()))
            .with_details(json!({
                "broken_date": req.broken_date,
                "notes": req.notes,
            }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// 送修：转入维修状态并开立维修记录；
    /// 提供完成日期时记录直接以 completed 落库
    pub async fn send_for_repair(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &RepairRequestBody,
    ) -> Result<Asset, AppError> {
        if req.issue_description.trim().is_empty() {
            return Err(AppError::validation("Issue description must not be empty"));
        }

        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let current = parse_status(&asset.status)?;
        let plan = lifecycle::plan(current, LifecycleAction::SendForRepair)?;

        let updated = self
            .apply_plan_tx(&mut tx, actor.organisation_id, id, &plan)
            .await?;

        self.assets
            .create_repair_tx(
                &mut tx,
                actor.organisation_id,
                id,
                req.issue_description.trim(),
                req.cost,
                req.completed_date,
                req.notes.as_deref(),
            )
            .await?;

        let entry = NewHistoryEntry::new(plan.history_action)
            .with_values(Some(asset.status.clone()), Some(updated.status.clone()))
            .with_details(json!({
                "issue_description": req.issue_description,
                "cost": req.cost,
                "completed_date": req.completed_date,
                "notes": req.notes,
            }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// 完成维修，资产回到指定状态（默认 available）
    pub async fn complete_repair(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &CompleteRepairRequest,
    ) -> Result<Asset, AppError> {
        let return_status = match &req.return_status {
            Some(s) => parse_status(s)?,
            None => AssetStatus::Available,
        };

        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let current = parse_status(&asset.status)?;
        let plan = lifecycle::plan(current, LifecycleAction::CompleteRepair { return_status })?;

        let updated = self
            .apply_plan_tx(&mut tx, actor.organisation_id, id, &plan)
            .await?;

        self.assets
            .complete_open_repair_tx(
                &mut tx,
                actor.organisation_id,
                id,
                req.cost,
                req.notes.as_deref(),
            )
            .await?;

        let entry = NewHistoryEntry::new(plan.history_action)
            .with_values(Some(asset.status.clone()), Some(updated.status.clone()))
            .with_details(json!({
                "cost": req.cost,
                "notes": req.notes,
            }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// 直接变更状态（处置、遗失、退役等）
    pub async fn change_status(
        &self,
        actor: &ActorContext,
        id: Uuid,
        req: &StatusChangeRequest,
    ) -> Result<Asset, AppError> {
        let target = parse_status(&req.status)?;
        self.change_status_inner(actor, id, target, req.notes.as_deref())
            .await
    }

    async fn change_status_inner(
        &self,
        actor: &ActorContext,
        id: Uuid,
        target: AssetStatus,
        notes: Option<&str>,
    ) -> Result<Asset, AppError> {
        let mut tx = self.assets.pool().begin().await?;

        let asset = self
            .assets
            .get_for_update_tx(&mut tx, actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        let current = parse_status(&asset.status)?;
        let plan = lifecycle::plan(current, LifecycleAction::SetStatus { target })?;

        let updated = self
            .apply_plan_tx(&mut tx, actor.organisation_id, id, &plan)
            .await?;

        let entry = NewHistoryEntry::new(plan.history_action)
            .with_values(Some(asset.status.clone()), Some(updated.status.clone()))
            .with_details(json!({ "notes": notes }));
        self.history
            .insert_tx(
                &mut tx,
                actor.organisation_id,
                id,
                &entry,
                Some(actor.user_id),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// 批量状态变更：逐个资产独立事务，单个失败不影响其余
    pub async fn bulk_change_status(
        &self,
        actor: &ActorContext,
        req: &BulkStatusRequest,
    ) -> Result<BulkOutcome, AppError> {
        let target = parse_status(&req.status)?;

        if req.asset_ids.is_empty() {
            return Err(AppError::validation("asset_ids must not be empty"));
        }

        let mut outcome = BulkOutcome {
            updated: 0,
            failed: Vec::new(),
        };

        for &asset_id in &req.asset_ids {
            match self
                .change_status_inner(actor, asset_id, target, None)
                .await
            {
                Ok(_) => outcome.updated += 1,
                Err(e) => outcome.failed.push(BulkFailure {
                    asset_id,
                    reason: e.user_message(),
                }),
            }
        }

        tracing::info!(
            updated = outcome.updated,
            failed = outcome.failed.len(),
            status = %target,
            "Bulk status change finished"
        );
        Ok(outcome)
    }

    /// 列出资产的维修记录
    pub async fn list_repairs(
        &self,
        actor: &ActorContext,
        id: Uuid,
    ) -> Result<Vec<Repair>, AppError> {
        // 确认资产存在且属于本组织
        self.assets
            .get(actor.organisation_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Asset not found"))?;

        self.assets.list_repairs(actor.organisation_id, id).await
    }

    // ==================== Helpers ====================

    async fn apply_plan_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        id: Uuid,
        plan: &TransitionPlan,
    ) -> Result<Asset, AppError> {
        self.assets
            .apply_transition_tx(
                tx,
                organisation_id,
                id,
                plan.new_status.as_str(),
                plan.clear_assignment,
                None,
                None,
                None,
                None,
                None,
            )
            .await
    }

    async fn enrich(&self, asset: Asset) -> Result<AssetResponse, AppError> {
        let category_name = self
            .lookups
            .name_of(LookupKind::Category, asset.category_id)
            .await?;
        let make_name = self.lookups.name_of(LookupKind::Make, asset.make_id).await?;
        let department_name = self
            .lookups
            .name_of(LookupKind::Department, asset.department_id)
            .await?;
        let location_name = self
            .lookups
            .name_of(LookupKind::Location, asset.location_id)
            .await?;

        Ok(AssetResponse {
            asset,
            category_name,
            make_name,
            department_name,
            location_name,
        })
    }
}

fn parse_status(s: &str) -> Result<AssetStatus, AppError> {
    AssetStatus::parse(s)
        .ok_or_else(|| AppError::validation(format!("Unknown asset status '{}'", s)))
}

fn update_details(req: &UpdateAssetRequest) -> serde_json::Value {
    let mut map = serde_json::Map::new();

    if let Some(v) = &req.asset_id {
        map.insert("asset_id".to_string(), json!(v));
    }
    if let Some(v) = &req.name {
        map.insert("name".to_string(), json!(v));
    }
    if let Some(v) = &req.serial_number {
        map.insert("serial_number".to_string(), json!(v));
    }
    if let Some(v) = &req.description {
        map.insert("description".to_string(), json!(v));
    }
    if let Some(v) = &req.model {
        map.insert("model".to_string(), json!(v));
    }
    if let Some(v) = &req.category_id {
        map.insert("category_id".to_string(), json!(v));
    }
    if let Some(v) = &req.make_id {
        map.insert("make_id".to_string(), json!(v));
    }
    if let Some(v) = &req.department_id {
        map.insert("department_id".to_string(), json!(v));
    }
    if let Some(v) = &req.location_id {
        map.insert("location_id".to_string(), json!(v));
    }
    if let Some(v) = &req.purchase_date {
        map.insert("purchase_date".to_string(), json!(v));
    }
    if let Some(v) = &req.purchase_price {
        map.insert("purchase_price".to_string(), json!(v));
    }
    if let Some(v) = &req.warranty_expiry {
        map.insert("warranty_expiry".to_string(), json!(v));
    }

    serde_json::Value::Object(map)
}
