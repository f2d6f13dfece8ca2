//! User preference domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User preference blob; the value is opaque JSON owned by the client
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPreference {
    pub user_id: Uuid,
    pub pref_key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Set preference request
#[derive(Debug, Deserialize)]
pub struct SetPreferenceRequest {
    pub value: serde_json::Value,
}
