//! Asset history domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only asset history entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AssetHistory {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub organisation_id: Uuid,
    pub action: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub details: Option<serde_json::Value>,
    pub performed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// History action enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    CheckedOut,
    CheckedIn,
    StatusChanged,
    MarkedAsBroken,
    SentForRepair,
    Deleted,
    Replicated,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Created => "created",
            HistoryAction::Updated => "updated",
            HistoryAction::CheckedOut => "checked_out",
            HistoryAction::CheckedIn => "checked_in",
            HistoryAction::StatusChanged => "status_changed",
            HistoryAction::MarkedAsBroken => "marked_as_broken",
            HistoryAction::SentForRepair => "sent_for_repair",
            HistoryAction::Deleted => "deleted",
            HistoryAction::Replicated => "replicated",
        }
    }
}

/// New history entry, written inside the same transaction as the asset mutation
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub action: HistoryAction,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl NewHistoryEntry {
    pub fn new(action: HistoryAction) -> Self {
        Self {
            action,
            old_value: None,
            new_value: None,
            details: None,
        }
    }

    pub fn with_values(mut self, old: Option<String>, new: Option<String>) -> Self {
        self.old_value = old;
        self.new_value = new;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// History list filters
#[derive(Debug, Default, Deserialize)]
pub struct HistoryListFilters {
    pub action: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// History entry rendered for display
#[derive(Debug, Serialize)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub action: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    /// Human-readable description assembled from the details payload
    pub description: String,
    pub performed_by: Option<Uuid>,
    pub performed_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
