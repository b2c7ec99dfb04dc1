//! GraphQL schema definition
//!
//! Resolvers live in domain modules under `queries/` and `mutations/`; this
//! file merges them into the roots and registers the shared data every
//! resolver reads from the context.

use async_graphql::dataloader::DataLoader;
use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;

use super::loaders::{
    AuthorsOf, MemberTypesById, PostsByAuthor, ProfileByUser, ProfilesByMemberType,
    RelationLoader, SubscribersOf, UsersById,
};
use super::mutations::{PostMutations, ProfileMutations, UserMutations};
use super::queries::{MemberTypeQueries, PostQueries, ProfileQueries, UserQueries};

/// The GraphQL schema type
pub type MemberboardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
#[graphql(name = "Query")]
pub struct QueryRoot(UserQueries, PostQueries, ProfileQueries, MemberTypeQueries);

#[derive(MergedObject, Default)]
#[graphql(name = "Mutation")]
pub struct MutationRoot(PostMutations, ProfileMutations, UserMutations);

/// Query limits enforced by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaLimits {
    pub depth: usize,
    pub complexity: usize,
    pub introspection: bool,
}

impl Default for SchemaLimits {
    fn default() -> Self {
        Self {
            depth: 15,
            complexity: 500,
            introspection: true,
        }
    }
}

/// Build the GraphQL schema with all resolvers.
///
/// Relation loaders batch per tick but keep no cache, so one schema is safe to
/// share across requests. Per-request list caching is installed by the HTTP
/// handler as a [`RequestContext`](super::context::RequestContext).
pub fn build_schema(db: Database, limits: &SchemaLimits) -> MemberboardSchema {
    let mut builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(DataLoader::new(RelationLoader::<UsersById>::new(db.clone()), tokio::spawn))
    .data(DataLoader::new(RelationLoader::<MemberTypesById>::new(db.clone()), tokio::spawn))
    .data(DataLoader::new(RelationLoader::<PostsByAuthor>::new(db.clone()), tokio::spawn))
    .data(DataLoader::new(RelationLoader::<ProfileByUser>::new(db.clone()), tokio::spawn))
    .data(DataLoader::new(
        RelationLoader::<ProfilesByMemberType>::new(db.clone()),
        tokio::spawn,
    ))
    .data(DataLoader::new(RelationLoader::<SubscribersOf>::new(db.clone()), tokio::spawn))
    .data(DataLoader::new(RelationLoader::<AuthorsOf>::new(db.clone()), tokio::spawn))
    .data(db)
    .extension(Tracing)
    .limit_depth(limits.depth)
    .limit_complexity(limits.complexity);

    if !limits.introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}
