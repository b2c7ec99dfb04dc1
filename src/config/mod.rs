//! Application configuration management

use std::env;

use anyhow::{Context, Result};

use crate::graphql::SchemaLimits;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for log lines only)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// SQLite URL, e.g. `sqlite://./data/memberboard.db`
    pub database_url: String,

    /// Maximum pooled database connections
    pub database_max_connections: u32,

    /// Maximum selection depth accepted by the GraphQL schema
    pub graphql_depth_limit: usize,

    /// Maximum query complexity accepted by the GraphQL schema
    pub graphql_complexity_limit: usize,

    /// Serve `__schema` / `__type` introspection
    pub graphql_introspection: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://./data/memberboard.db".to_string()),

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            graphql_depth_limit: env::var("GRAPHQL_DEPTH_LIMIT")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .context("Invalid GRAPHQL_DEPTH_LIMIT")?,

            graphql_complexity_limit: env::var("GRAPHQL_COMPLEXITY_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("Invalid GRAPHQL_COMPLEXITY_LIMIT")?,

            graphql_introspection: env::var("GRAPHQL_INTROSPECTION")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        })
    }

    /// Limits applied when building the GraphQL schema
    pub fn schema_limits(&self) -> SchemaLimits {
        SchemaLimits {
            depth: self.graphql_depth_limit,
            complexity: self.graphql_complexity_limit,
            introspection: self.graphql_introspection,
        }
    }
}
