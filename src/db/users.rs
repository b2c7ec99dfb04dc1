//! Users repository
//!
//! The list query can optionally carry both directions of the subscription
//! graph so that nested resolvers do not need a second round trip.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::sqlite_helpers::{ensure_affected, new_id, placeholders};
use super::subscriptions::SubscriptionRepository;

/// User record from database
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub balance: f64,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub balance: f64,
}

/// Input for updating a user. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub balance: Option<f64>,
}

/// Which relation edges to include in a user list fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UserInclude {
    /// Subscribers of each user (edges where the user is the author)
    pub subscribed_to_user: bool,
    /// Authors each user follows (edges where the user is the subscriber)
    pub user_subscribed_to: bool,
}

impl UserInclude {
    pub fn any(&self) -> bool {
        self.subscribed_to_user || self.user_subscribed_to
    }
}

/// A user row plus whichever edge id lists were requested.
///
/// `None` means the edge list was not fetched; `Some(vec![])` means it was
/// fetched and is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListEntry {
    pub user: UserRecord,
    pub subscribed_to_user: Option<Vec<String>>,
    pub user_subscribed_to: Option<Vec<String>>,
}

/// Users repository
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all users, including the requested subscription edges
    pub async fn list(&self, include: UserInclude) -> Result<Vec<UserListEntry>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, balance
            FROM users
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        if !include.any() {
            return Ok(users
                .into_iter()
                .map(|user| UserListEntry {
                    user,
                    subscribed_to_user: None,
                    user_subscribed_to: None,
                })
                .collect());
        }

        let edges = SubscriptionRepository::new(self.pool.clone())
            .list_all()
            .await?;

        let mut subscribers: HashMap<&str, Vec<String>> = HashMap::new();
        let mut authors: HashMap<&str, Vec<String>> = HashMap::new();
        for edge in &edges {
            subscribers
                .entry(edge.author_id.as_str())
                .or_default()
                .push(edge.subscriber_id.clone());
            authors
                .entry(edge.subscriber_id.as_str())
                .or_default()
                .push(edge.author_id.clone());
        }

        tracing::debug!(
            users = users.len(),
            edges = edges.len(),
            ?include,
            "Loaded users with subscription edges"
        );

        Ok(users
            .into_iter()
            .map(|user| {
                let subscribed_to_user = include.subscribed_to_user.then(|| {
                    subscribers
                        .get(user.id.as_str())
                        .cloned()
                        .unwrap_or_default()
                });
                let user_subscribed_to = include
                    .user_subscribed_to
                    .then(|| authors.get(user.id.as_str()).cloned().unwrap_or_default());
                UserListEntry {
                    user,
                    subscribed_to_user,
                    user_subscribed_to,
                }
            })
            .collect())
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, balance
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Get many users by ID in a single query
    pub async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<UserRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, balance FROM users WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_as::<_, UserRecord>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Create a user
    pub async fn create(&self, input: CreateUser) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, name, balance)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, balance
            "#,
        )
        .bind(new_id())
        .bind(&input.name)
        .bind(input.balance)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Update a user, failing if it does not exist
    pub async fn update(&self, id: &str, input: UpdateUser) -> Result<UserRecord> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET name = COALESCE(?2, name),
                balance = COALESCE(?3, balance)
            WHERE id = ?1
            RETURNING id, name, balance
            "#,
        )
        .bind(id)
        .bind(input.name)
        .bind(input.balance)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("Record to update does not exist in users"))
    }

    /// Delete a user, failing if it does not exist
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        ensure_affected(result.rows_affected(), "delete", "users")
    }
}
