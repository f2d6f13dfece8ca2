//! Asset domain models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Asset record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub asset_tag: String,
    pub asset_id: Option<String>,
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub category_id: Option<Uuid>,
    pub make_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub status: String, // available, in_use, maintenance, disposed, lost, retired
    pub assigned_to: Option<String>,
    pub checked_out_to: Option<Uuid>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub expected_return_date: Option<NaiveDate>,
    pub check_out_notes: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub warranty_expiry: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

/// Asset status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Available,
    InUse,
    Maintenance,
    Disposed,
    Lost,
    Retired,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "available",
            AssetStatus::InUse => "in_use",
            AssetStatus::Maintenance => "maintenance",
            AssetStatus::Disposed => "disposed",
            AssetStatus::Lost => "lost",
            AssetStatus::Retired => "retired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "available" => Some(AssetStatus::Available),
            "in_use" => Some(AssetStatus::InUse),
            "maintenance" => Some(AssetStatus::Maintenance),
            "disposed" => Some(AssetStatus::Disposed),
            "lost" => Some(AssetStatus::Lost),
            "retired" => Some(AssetStatus::Retired),
            _ => None,
        }
    }

    /// Terminal statuses release any assignment the asset held
    pub fn releases_assignment(&self) -> bool {
        matches!(self, AssetStatus::Disposed | AssetStatus::Lost)
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Create asset request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssetRequest {
    /// Explicit tag; when absent one is allocated from the category's tag format
    #[validate(length(min = 1, max = 50))]
    pub asset_tag: Option<String>,
    pub asset_id: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub category_id: Option<Uuid>,
    pub make_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub warranty_expiry: Option<NaiveDate>,
}

/// Update asset request (all fields optional)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    pub asset_id: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub description: Option<String>,
    pub model: Option<String>,
    pub category_id: Option<Uuid>,
    pub make_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_price: Option<f64>,
    pub warranty_expiry: Option<NaiveDate>,
}

/// Asset list filters
#[derive(Debug, Default, Deserialize)]
pub struct AssetListFilters {
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub search: Option<String>, // Search in asset_tag/name/serial_number
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Check out request
#[derive(Debug, Deserialize)]
pub struct CheckOutRequest {
    pub checked_out_to: Option<Uuid>,
    pub assigned_to: Option<String>,
    pub expected_return_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Check in request
#[derive(Debug, Default, Deserialize)]
pub struct CheckInRequest {
    pub notes: Option<String>,
}

/// Mark as broken or lost request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MarkBrokenRequest {
    pub broken_date: Option<NaiveDate>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Send for repair request
#[derive(Debug, Deserialize, Validate)]
pub struct RepairRequestBody {
    #[validate(length(min = 1, max = 500))]
    pub issue_description: String,
    pub cost: Option<f64>,
    /// When supplied the repair record is created already completed
    pub completed_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Direct status change request
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// Bulk status change request
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub asset_ids: Vec<Uuid>,
    pub status: String,
}

/// Per-asset failure inside a bulk operation
#[derive(Debug, Serialize)]
pub struct BulkFailure {
    pub asset_id: Uuid,
    pub reason: String,
}

/// Bulk operation outcome
#[derive(Debug, Serialize)]
pub struct BulkOutcome {
    pub updated: u64,
    pub failed: Vec<BulkFailure>,
}

/// Asset response with resolved lookup names
#[derive(Debug, Serialize)]
pub struct AssetResponse {
    #[serde(flatten)]
    pub asset: Asset,
    pub category_name: Option<String>,
    pub make_name: Option<String>,
    pub department_name: Option<String>,
    pub location_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in ["available", "in_use", "maintenance", "disposed", "lost", "retired"] {
            assert_eq!(AssetStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(AssetStatus::parse("broken").is_none());
    }

    #[test]
    fn test_repair_request_validation() {
        let valid = RepairRequestBody {
            issue_description: "Screen cracked".to_string(),
            cost: None,
            completed_date: None,
            notes: None,
        };
        assert!(valid.validate().is_ok());

        let empty_issue = RepairRequestBody {
            issue_description: String::new(),
            cost: None,
            completed_date: None,
            notes: None,
        };
        assert!(empty_issue.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_empty_tag() {
        let req = CreateAssetRequest {
            asset_tag: Some(String::new()),
            asset_id: None,
            name: None,
            serial_number: None,
            description: None,
            model: None,
            category_id: None,
            make_id: None,
            department_id: None,
            location_id: None,
            purchase_date: None,
            purchase_price: None,
            warranty_expiry: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_releases_assignment() {
        assert!(AssetStatus::Disposed.releases_assignment());
        assert!(AssetStatus::Lost.releases_assignment());
        assert!(!AssetStatus::Retired.releases_assignment());
        assert!(!AssetStatus::Maintenance.releases_assignment());
    }
}
