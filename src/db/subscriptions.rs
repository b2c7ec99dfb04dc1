//! Subscriber -> author edges
//!
//! Rows are keyed by the composite `(subscriber_id, author_id)`.

use anyhow::Result;
use sqlx::SqlitePool;

use super::sqlite_helpers::{ensure_affected, placeholders};
use super::users::UserRecord;

/// A single subscription edge
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SubscriptionEdge {
    pub subscriber_id: String,
    pub author_id: String,
}

/// A user row tagged with the id of the user it was looked up for
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LinkedUserRecord {
    pub parent_id: String,
    pub id: String,
    pub name: String,
    pub balance: f64,
}

impl From<LinkedUserRecord> for UserRecord {
    fn from(r: LinkedUserRecord) -> Self {
        UserRecord {
            id: r.id,
            name: r.name,
            balance: r.balance,
        }
    }
}

pub struct SubscriptionRepository {
    pool: SqlitePool,
}

impl SubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every edge
    pub async fn list_all(&self) -> Result<Vec<SubscriptionEdge>> {
        let edges = sqlx::query_as::<_, SubscriptionEdge>(
            r#"
            SELECT subscriber_id, author_id
            FROM subscribers_on_authors
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(edges)
    }

    /// Authors followed by each of the given subscribers
    pub async fn authors_of(&self, subscriber_ids: &[String]) -> Result<Vec<LinkedUserRecord>> {
        self.linked_users("subscriber_id", "author_id", subscriber_ids)
            .await
    }

    /// Subscribers of each of the given authors
    pub async fn subscribers_of(&self, author_ids: &[String]) -> Result<Vec<LinkedUserRecord>> {
        self.linked_users("author_id", "subscriber_id", author_ids)
            .await
    }

    async fn linked_users(
        &self,
        parent_column: &'static str,
        target_column: &'static str,
        parent_ids: &[String],
    ) -> Result<Vec<LinkedUserRecord>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT s.{parent} AS parent_id, u.id, u.name, u.balance \
             FROM subscribers_on_authors s \
             JOIN users u ON u.id = s.{target} \
             WHERE s.{parent} IN ({}) \
             ORDER BY s.rowid",
            placeholders(parent_ids.len()),
            parent = parent_column,
            target = target_column,
        );

        let mut query = sqlx::query_as::<_, LinkedUserRecord>(&sql);
        for id in parent_ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Create an edge. Unknown users fail the foreign key check.
    pub async fn create(&self, subscriber_id: &str, author_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscribers_on_authors (subscriber_id, author_id)
            VALUES (?1, ?2)
            "#,
        )
        .bind(subscriber_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete an edge, failing if it does not exist
    pub async fn delete(&self, subscriber_id: &str, author_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM subscribers_on_authors
            WHERE subscriber_id = ?1 AND author_id = ?2
            "#,
        )
        .bind(subscriber_id)
        .bind(author_id)
        .execute(&self.pool)
        .await?;

        ensure_affected(result.rows_affected(), "delete", "subscribers_on_authors")
    }
}
