//! 资产标签分配器
//!
//! 下一个标签号由组织内匹配前缀的现有标签重新计算得出，
//! tag_formats.current_number 只是缓存。分配在事务内对格式行
//! 加锁串行化，资产表上的标签唯一约束兜底并发冲突。

use crate::{
    config::AssetsConfig,
    error::AppError,
    models::tag::{TagFormat, TagPreview, UpsertTagFormatRequest},
    repository::TagRepository,
};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

/// 从现有标签中计算下一个编号
///
/// 前缀剥离后必须是纯数字才参与计算，其余标签忽略；
/// 没有任何匹配标签时从 1 开始。
pub fn next_tag_number(prefix: &str, existing_tags: &[String]) -> i64 {
    existing_tags
        .iter()
        .filter_map(|tag| tag.strip_prefix(prefix))
        .filter_map(|rest| rest.parse::<i64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// 按补零位数格式化标签，编号超出位数时自然变宽不截断
pub fn format_tag(prefix: &str, padding_length: i32, number: i64) -> String {
    format!(
        "{}{:0width$}",
        prefix,
        number,
        width = padding_length.max(0) as usize
    )
}

pub struct TagService {
    repo: Arc<TagRepository>,
    defaults: AssetsConfig,
}

impl TagService {
    pub fn new(repo: Arc<TagRepository>, defaults: AssetsConfig) -> Self {
        Self { repo, defaults }
    }

    /// 预览下一个将被分配的标签，不消耗编号
    pub async fn preview(
        &self,
        organisation_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<TagPreview, AppError> {
        let format = self.repo.find_format(organisation_id, category_id).await?;

        let (prefix, padding, configured) = match &format {
            Some(f) => (f.prefix.clone(), f.padding_length, true),
            None => (
                self.defaults.default_tag_prefix.clone(),
                self.defaults.default_tag_padding as i32,
                false,
            ),
        };

        let tags = self
            .repo
            .existing_tags_with_prefix(organisation_id, &prefix)
            .await?;
        let number = next_tag_number(&prefix, &tags);

        Ok(TagPreview {
            next_tag: format_tag(&prefix, padding, number),
            prefix,
            padding_length: padding,
            configured,
        })
    }

    /// 分配下一个标签（事务内）
    ///
    /// 有配置格式时锁定格式行串行化并发分配并回写编号缓存；
    /// 未配置时直接用默认前缀计算，冲突由标签唯一约束拦截。
    pub async fn allocate_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<String, AppError> {
        let format = self.repo.find_format(organisation_id, category_id).await?;

        let (format_id, prefix, padding) = match &format {
            Some(f) => (Some(f.id), f.prefix.clone(), f.padding_length),
            None => (
                None,
                self.defaults.default_tag_prefix.clone(),
                self.defaults.default_tag_padding as i32,
            ),
        };

        if let Some(id) = format_id {
            // 格式行可能在查找后被删除，锁不到时按默认流程继续
            self.repo.lock_format_tx(tx, id).await?;
        }

        let tags = self
            .repo
            .existing_tags_with_prefix_tx(tx, organisation_id, &prefix)
            .await?;
        let number = next_tag_number(&prefix, &tags);

        if let Some(id) = format_id {
            self.repo.update_current_number_tx(tx, id, number).await?;
        }

        let tag = format_tag(&prefix, padding, number);
        tracing::debug!(%organisation_id, tag = %tag, "Asset tag allocated");

        Ok(tag)
    }

    // ==================== 格式管理 ====================

    pub async fn list_formats(&self, organisation_id: Uuid) -> Result<Vec<TagFormat>, AppError> {
        self.repo.list_formats(organisation_id).await
    }

    /// 创建或替换标签格式，省略补零位数时用组织默认值
    pub async fn upsert_format(
        &self,
        organisation_id: Uuid,
        req: &UpsertTagFormatRequest,
    ) -> Result<TagFormat, AppError> {
        let prefix = req.prefix.trim();
        if prefix.is_empty() {
            return Err(AppError::validation("Prefix must not be empty"));
        }

        let padding = req
            .padding_length
            .unwrap_or(self.defaults.default_tag_padding as i32);

        self.repo
            .upsert_format(organisation_id, req.category_id, prefix, padding)
            .await
    }

    pub async fn delete_format(&self, organisation_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        self.repo.delete_format(organisation_id, id).await
    }
}
