//! Repair record domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Repair record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Repair {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub organisation_id: Uuid,
    pub status: String, // in_progress, completed
    pub issue_description: String,
    pub cost: Option<f64>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Complete repair request
#[derive(Debug, Deserialize)]
pub struct CompleteRepairRequest {
    pub cost: Option<f64>,
    pub notes: Option<String>,
    /// Status the asset returns to, defaults to available
    pub return_status: Option<String>,
}
