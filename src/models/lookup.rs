//! Lookup table domain models (sites, locations, categories, departments, makes)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic named lookup row shared by all setup tables
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LookupItem {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Lookup table kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Site,
    Location,
    Category,
    Department,
    Make,
}

impl LookupKind {
    /// Table name; only ever interpolated from this fixed set
    pub fn table(&self) -> &'static str {
        match self {
            LookupKind::Site => "sites",
            LookupKind::Location => "locations",
            LookupKind::Category => "categories",
            LookupKind::Department => "departments",
            LookupKind::Make => "makes",
        }
    }

    pub fn from_path(s: &str) -> Option<Self> {
        match s {
            "sites" => Some(LookupKind::Site),
            "locations" => Some(LookupKind::Location),
            "categories" => Some(LookupKind::Category),
            "departments" => Some(LookupKind::Department),
            "makes" => Some(LookupKind::Make),
            _ => None,
        }
    }
}

/// Create lookup item request
#[derive(Debug, Deserialize)]
pub struct CreateLookupRequest {
    pub name: String,
}

/// Rename lookup item request
#[derive(Debug, Deserialize)]
pub struct RenameLookupRequest {
    pub name: String,
}
