//! Page access control domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Per-organisation page access rule
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PageAccess {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub route: String,
    pub allowed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Single-route access check query
#[derive(Debug, Deserialize)]
pub struct AccessCheckQuery {
    pub route: String,
}

/// Single-route access decision
#[derive(Debug, Serialize)]
pub struct AccessDecision {
    pub route: String,
    pub allowed: bool,
}

/// Batch access check request
#[derive(Debug, Deserialize)]
pub struct BatchAccessRequest {
    pub routes: Vec<String>,
}

/// Batch access decisions keyed by route
#[derive(Debug, Serialize)]
pub struct BatchAccessResponse {
    pub results: HashMap<String, bool>,
}

/// Create or update an access rule
#[derive(Debug, Deserialize)]
pub struct UpsertAccessRequest {
    pub route: String,
    pub allowed: bool,
}
