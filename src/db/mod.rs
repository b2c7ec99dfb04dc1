//! Database connection and operations
//!
//! This is the persistence collaborator behind the GraphQL resolvers. Every
//! repository is a thin wrapper over the shared SQLite pool.

pub mod member_types;
pub mod posts;
pub mod profiles;
pub mod sqlite_helpers;
pub mod subscriptions;
pub mod users;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use member_types::{MemberTypeRecord, MemberTypeRepository};
pub use posts::{CreatePost, PostRecord, PostRepository, UpdatePost};
pub use profiles::{CreateProfile, ProfileRecord, ProfileRepository, UpdateProfile};
pub use subscriptions::{LinkedUserRecord, SubscriptionEdge, SubscriptionRepository};
pub use users::{CreateUser, UpdateUser, UserInclude, UserListEntry, UserRecord, UserRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .context("Failed to open database")?;

        tracing::info!(max_connections, "Database pool opened");
        Ok(Self { pool })
    }

    /// An in-memory pool that only connects when first used.
    ///
    /// Used where a schema must be built without a database, e.g. printing SDL.
    pub fn disconnected() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new().connect_lazy_with(options);
        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a users repository
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Get a profiles repository
    pub fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool.clone())
    }

    /// Get a posts repository
    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.pool.clone())
    }

    /// Get a member types repository
    pub fn member_types(&self) -> MemberTypeRepository {
        MemberTypeRepository::new(self.pool.clone())
    }

    /// Get a subscriptions (subscriber -> author edges) repository
    pub fn subscriptions(&self) -> SubscriptionRepository {
        SubscriptionRepository::new(self.pool.clone())
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
