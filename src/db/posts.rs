//! Posts repository

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::sqlite_helpers::{ensure_affected, new_id, placeholders};

/// Post record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PostRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Input for updating a post
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Posts repository
pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all posts
    pub async fn list(&self) -> Result<Vec<PostRecord>> {
        let records = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, title, content, author_id
            FROM posts
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get a post by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<PostRecord>> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            SELECT id, title, content, author_id
            FROM posts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List posts written by any of the given authors
    pub async fn list_by_authors(&self, author_ids: &[String]) -> Result<Vec<PostRecord>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, title, content, author_id FROM posts WHERE author_id IN ({}) ORDER BY rowid",
            placeholders(author_ids.len())
        );
        let mut query = sqlx::query_as::<_, PostRecord>(&sql);
        for id in author_ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Create a post
    pub async fn create(&self, input: CreatePost) -> Result<PostRecord> {
        let record = sqlx::query_as::<_, PostRecord>(
            r#"
            INSERT INTO posts (id, title, content, author_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, title, content, author_id
            "#,
        )
        .bind(new_id())
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Update a post, failing if it does not exist
    pub async fn update(&self, id: &str, input: UpdatePost) -> Result<PostRecord> {
        sqlx::query_as::<_, PostRecord>(
            r#"
            UPDATE posts
            SET title = COALESCE(?2, title),
                content = COALESCE(?3, content)
            WHERE id = ?1
            RETURNING id, title, content, author_id
            "#,
        )
        .bind(id)
        .bind(input.title)
        .bind(input.content)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("Record to update does not exist in posts"))
    }

    /// Delete a post, failing if it does not exist
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        ensure_affected(result.rows_affected(), "delete", "posts")
    }
}
