//! Tag format repository (标签格式数据访问)

use crate::{error::AppError, models::tag::TagFormat};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub struct TagRepository {
    db: PgPool,
}

impl TagRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 查找类别的标签格式，类别未配置时回退到组织默认格式
    pub async fn find_format(
        &self,
        organisation_id: Uuid,
        category_id: Option<Uuid>,
    ) -> Result<Option<TagFormat>, AppError> {
        if let Some(category_id) = category_id {
            let format = sqlx::query_as::<_, TagFormat>(
                "SELECT * FROM tag_formats WHERE organisation_id = $1 AND category_id = $2",
            )
            .bind(organisation_id)
            .bind(category_id)
            .fetch_optional(&self.db)
            .await?;

            if format.is_some() {
                return Ok(format);
            }
        }

        let default = sqlx::query_as::<_, TagFormat>(
            "SELECT * FROM tag_formats WHERE organisation_id = $1 AND category_id IS NULL",
        )
        .bind(organisation_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(default)
    }

    /// 锁定标签格式行（事务内），同一格式的并发分配在此串行化
    pub async fn lock_format_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        format_id: Uuid,
    ) -> Result<Option<TagFormat>, AppError> {
        let format = sqlx::query_as::<_, TagFormat>(
            "SELECT * FROM tag_formats WHERE id = $1 FOR UPDATE",
        )
        .bind(format_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(format)
    }

    /// 收集组织内匹配前缀的现有资产标签（事务内）
    ///
    /// 现有标签是权威数据源，包含软删除资产以避免标签复用。
    pub async fn existing_tags_with_prefix_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        organisation_id: Uuid,
        prefix: &str,
    ) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query(
            "SELECT asset_tag FROM assets WHERE organisation_id = $1 AND asset_tag LIKE $2 || '%'",
        )
        .bind(organisation_id)
        .bind(prefix)
        .fetch_all(&mut **tx)
        .await?;

        Ok(rows.into_iter().map(|r| r.get("asset_tag")).collect())
    }

    /// 收集现有标签（连接池，预览用）
    pub async fn existing_tags_with_prefix(
        &self,
        organisation_id: Uuid,
        prefix: &str,
    ) -> Result<Vec<String>, AppError> {
        let rows = sqlx::query(
            "SELECT asset_tag FROM assets WHERE organisation_id = $1 AND asset_tag LIKE $2 || '%'",
        )
        .bind(organisation_id)
        .bind(prefix)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.get("asset_tag")).collect())
    }

    /// 回写已分配的编号缓存（事务内）
    pub async fn update_current_number_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        format_id: Uuid,
        number: i64,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE tag_formats SET current_number = $2, updated_at = NOW() WHERE id = $1")
            .bind(format_id)
            .bind(number)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// 列出组织的标签格式
    pub async fn list_formats(&self, organisation_id: Uuid) -> Result<Vec<TagFormat>, AppError> {
        let formats = sqlx::query_as::<_, TagFormat>(
            "SELECT * FROM tag_formats WHERE organisation_id = $1 ORDER BY category_id NULLS FIRST",
        )
        .bind(organisation_id)
        .fetch_all(&self.db)
        .await?;

        Ok(formats)
    }

    /// 创建或更新标签格式
    pub async fn upsert_format(
        &self,
        organisation_id: Uuid,
        category_id: Option<Uuid>,
        prefix: &str,
        padding_length: i32,
    ) -> Result<TagFormat, AppError> {
        // UNIQUE(organisation_id, category_id) 对 NULL 不生效，
        // 组织默认格式需单独处理
        let format = if category_id.is_some() {
            sqlx::query_as::<_, TagFormat>(
                r#"
                INSERT INTO tag_formats (organisation_id, category_id, prefix, padding_length)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (organisation_id, category_id)
                DO UPDATE SET prefix = $3, padding_length = $4, updated_at = NOW()
                RETURNING *
                "#,
            )
            .bind(organisation_id)
            .bind(category_id)
            .bind(prefix)
            .bind(padding_length)
            .fetch_one(&self.db)
            .await?
        } else {
            let existing = sqlx::query_as::<_, TagFormat>(
                r#"
                UPDATE tag_formats
                SET prefix = $2, padding_length = $3, updated_at = NOW()
                WHERE organisation_id = $1 AND category_id IS NULL
                RETURNING *
                "#,
            )
            .bind(organisation_id)
            .bind(prefix)
            .bind(padding_length)
            .fetch_optional(&self.db)
            .await?;

            match existing {
                Some(f) => f,
                None => {
                    sqlx::query_as::<_, TagFormat>(
                        r#"
                        INSERT INTO tag_formats (organisation_id, category_id, prefix, padding_length)
                        VALUES ($1, NULL, $2, $3)
                        RETURNING *
                        "#,
                    )
                    .bind(organisation_id)
                    .bind(prefix)
                    .bind(padding_length)
                    .fetch_one(&self.db)
                    .await?
                }
            }
        };

        Ok(format)
    }

    /// 删除标签格式
    pub async fn delete_format(&self, organisation_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tag_formats WHERE id = $1 AND organisation_id = $2")
            .bind(id)
            .bind(organisation_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
