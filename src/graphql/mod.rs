//! GraphQL API over users, profiles, posts and membership tiers
//!
//! The read path for `users` goes through a per-request batched cache
//! ([`loader_cache`]) keyed by the requested sub-fields; nested relations go
//! through schema-wide DataLoaders ([`loaders`]). Identifiers crossing the API
//! are validated by the custom scalars in [`scalars`].
//!
//! Resolvers are split by domain under `queries/` and `mutations/`, each a
//! `#[derive(Default)]` struct merged into the roots in `schema.rs`.

pub mod context;
pub mod descriptors;
pub mod errors;
pub mod loader_cache;
pub mod loaders;
pub mod mutations;
pub mod queries;
pub mod scalars;
mod schema;
pub mod types;

pub use context::{RequestContext, RequestContextExt};
pub use errors::ApiError;
pub use schema::{MemberboardSchema, MutationRoot, QueryRoot, SchemaLimits, build_schema};
