//! 资产历史服务
//!
//! 历史记录的写入发生在资产变更事务内（见 AssetService），
//! 本服务负责查询与展示渲染。

use crate::{
    error::AppError,
    models::history::{HistoryEntryResponse, HistoryListFilters},
    repository::HistoryRepository,
};
use chrono::DateTime;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 渲染时跳过的内部键，这些只是外键不适合展示
const HIDDEN_DETAIL_KEYS: &[&str] = &["user_id", "location_id", "department_id", "checkout_type"];

/// snake_case 键转为展示标签，如 expected_return_date → Expected Return Date
pub fn title_case_label(key: &str) -> String {
    key.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// ISO 8601 时间戳渲染为 dd/mm/yyyy HH:MM，其余值原样返回
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                dt.format("%d/%m/%Y %H:%M").to_string()
            } else {
                s.clone()
            }
        }
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 将 details 负载渲染为一行可读描述
pub fn render_details(details: Option<&serde_json::Value>) -> String {
    let Some(serde_json::Value::Object(map)) = details else {
        return String::new();
    };

    let mut parts: Vec<String> = Vec::new();
    for (key, value) in map {
        if HIDDEN_DETAIL_KEYS.contains(&key.as_str()) {
            continue;
        }

        let rendered = render_value(value);
        if rendered.is_empty() {
            continue;
        }

        parts.push(format!("{}: {}", title_case_label(key), rendered));
    }

    parts.join(", ")
}

pub struct HistoryService {
    repo: Arc<HistoryRepository>,
}

impl HistoryService {
    pub fn new(repo: Arc<HistoryRepository>) -> Self {
        Self { repo }
    }

    /// 查询资产历史，按时间倒序并渲染展示字段
    pub async fn list(
        &self,
        organisation_id: Uuid,
        asset_id: Uuid,
        filters: &HistoryListFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<HistoryEntryResponse>, i64), AppError> {
        let records = self
            .repo
            .list(organisation_id, asset_id, filters, limit, offset)
            .await?;
        let total = self.repo.count(organisation_id, asset_id, filters).await?;

        // 批量解析执行者显示名
        let mut performer_ids: Vec<Uuid> =
            records.iter().filter_map(|r| r.performed_by).collect();
        performer_ids.sort();
        performer_ids.dedup();

        let names: HashMap<Uuid, String> = self
            .repo
            .performer_names(&performer_ids)
            .await?
            .into_iter()
            .collect();

        let entries = records
            .into_iter()
            .map(|r| HistoryEntryResponse {
                id: r.id,
                asset_id: r.asset_id,
                action: r.action,
                old_value: r.old_value,
                new_value: r.new_value,
                description: render_details(r.details.as_ref()),
                performed_by: r.performed_by,
                performed_by_name: r
                    .performed_by
                    .and_then(|id| names.get(&id).cloned()),
                created_at: r.created_at,
            })
            .collect();

        Ok((entries, total))
    }
}
