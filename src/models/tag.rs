//! Asset tag format domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Tag format configuration; category_id NULL means the organisation default
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagFormat {
    pub id: Uuid,
    pub organisation_id: Uuid,
    pub category_id: Option<Uuid>,
    pub prefix: String,
    pub padding_length: i32,
    /// Cache of the last allocated number; existing tags remain authoritative
    pub current_number: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or replace a tag format
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertTagFormatRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 16))]
    pub prefix: String,
    #[validate(range(min = 1, max = 12))]
    pub padding_length: Option<i32>,
}

/// Preview of the next tag that would be allocated
#[derive(Debug, Serialize)]
pub struct TagPreview {
    pub next_tag: String,
    pub prefix: String,
    pub padding_length: i32,
    /// False when no format is configured and defaults were used
    pub configured: bool,
}
