//! Profiles repository
//!
//! A user has at most one profile; every profile belongs to a membership tier.

use anyhow::{Result, anyhow};
use sqlx::SqlitePool;

use super::sqlite_helpers::{bool_to_int, ensure_affected, int_to_bool, new_id, placeholders};

/// Profile record from database
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub id: String,
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: String,
    pub member_type_id: String,
}

impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for ProfileRecord {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> sqlx::Result<Self> {
        use sqlx::Row;

        let is_male_int: i32 = row.try_get("is_male")?;

        Ok(Self {
            id: row.try_get("id")?,
            is_male: int_to_bool(is_male_int),
            year_of_birth: row.try_get("year_of_birth")?,
            user_id: row.try_get("user_id")?,
            member_type_id: row.try_get("member_type_id")?,
        })
    }
}

/// Input for creating a profile
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: String,
    pub member_type_id: String,
}

/// Input for updating a profile
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub is_male: Option<bool>,
    pub year_of_birth: Option<i32>,
    pub member_type_id: Option<String>,
}

const PROFILE_COLUMNS: &str = "id, is_male, year_of_birth, user_id, member_type_id";

/// Profiles repository
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all profiles
    pub async fn list(&self) -> Result<Vec<ProfileRecord>> {
        let sql = format!("SELECT {} FROM profiles ORDER BY rowid", PROFILE_COLUMNS);
        let records = sqlx::query_as::<_, ProfileRecord>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Get a profile by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<ProfileRecord>> {
        let sql = format!("SELECT {} FROM profiles WHERE id = ?1", PROFILE_COLUMNS);
        let record = sqlx::query_as::<_, ProfileRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Profiles owned by any of the given users
    pub async fn list_by_users(&self, user_ids: &[String]) -> Result<Vec<ProfileRecord>> {
        self.list_by_column("user_id", user_ids).await
    }

    /// Profiles on any of the given membership tiers
    pub async fn list_by_member_types(&self, member_type_ids: &[String]) -> Result<Vec<ProfileRecord>> {
        self.list_by_column("member_type_id", member_type_ids).await
    }

    async fn list_by_column(&self, column: &'static str, keys: &[String]) -> Result<Vec<ProfileRecord>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM profiles WHERE {} IN ({}) ORDER BY rowid",
            PROFILE_COLUMNS,
            column,
            placeholders(keys.len())
        );
        let mut query = sqlx::query_as::<_, ProfileRecord>(&sql);
        for key in keys {
            query = query.bind(key);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Create a profile
    pub async fn create(&self, input: CreateProfile) -> Result<ProfileRecord> {
        let sql = format!(
            "INSERT INTO profiles ({cols}) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {cols}",
            cols = PROFILE_COLUMNS
        );
        let record = sqlx::query_as::<_, ProfileRecord>(&sql)
            .bind(new_id())
            .bind(bool_to_int(input.is_male))
            .bind(input.year_of_birth)
            .bind(&input.user_id)
            .bind(&input.member_type_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    /// Update a profile, failing if it does not exist
    pub async fn update(&self, id: &str, input: UpdateProfile) -> Result<ProfileRecord> {
        let sql = format!(
            "UPDATE profiles \
             SET is_male = COALESCE(?2, is_male), \
                 year_of_birth = COALESCE(?3, year_of_birth), \
                 member_type_id = COALESCE(?4, member_type_id) \
             WHERE id = ?1 \
             RETURNING {}",
            PROFILE_COLUMNS
        );
        sqlx::query_as::<_, ProfileRecord>(&sql)
            .bind(id)
            .bind(input.is_male.map(bool_to_int))
            .bind(input.year_of_birth)
            .bind(input.member_type_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| anyhow!("Record to update does not exist in profiles"))
    }

    /// Delete a profile, failing if it does not exist
    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        ensure_affected(result.rows_affected(), "delete", "profiles")
    }
}
