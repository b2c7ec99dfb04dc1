//! Membership tier repository
//!
//! Tiers are seeded by the initial migration and are read-only at runtime.

use anyhow::Result;
use sqlx::SqlitePool;

use super::sqlite_helpers::placeholders;

/// Membership tier record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MemberTypeRecord {
    pub id: String,
    pub discount: f64,
    pub posts_limit_per_month: i32,
}

pub struct MemberTypeRepository {
    pool: SqlitePool,
}

impl MemberTypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all membership tiers
    pub async fn list(&self) -> Result<Vec<MemberTypeRecord>> {
        let records = sqlx::query_as::<_, MemberTypeRecord>(
            r#"
            SELECT id, discount, posts_limit_per_month
            FROM member_types
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get a membership tier by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<MemberTypeRecord>> {
        let record = sqlx::query_as::<_, MemberTypeRecord>(
            r#"
            SELECT id, discount, posts_limit_per_month
            FROM member_types
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get many membership tiers by ID
    pub async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<MemberTypeRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, discount, posts_limit_per_month FROM member_types WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, MemberTypeRecord>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}
