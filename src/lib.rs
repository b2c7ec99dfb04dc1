//! Memberboard - GraphQL API over users, profiles, posts and membership tiers

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod graphql;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::graphql::MemberboardSchema;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub schema: MemberboardSchema,
}
