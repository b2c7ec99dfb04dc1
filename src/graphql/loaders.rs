//! GraphQL DataLoaders for batching relation queries
//!
//! DataLoaders solve the N+1 problem for nested relation fields: when a list of
//! posts each resolves `author`, every resolver calls `loader.load_one(id)` and
//! the loader issues one `WHERE ... IN (...)` query per tick.
//!
//! # Adding a New Relation
//!
//! 1. Add a marker type and implement [`BatchRelation`] for it
//! 2. Register a `DataLoader<RelationLoader<Marker>>` in [`build_schema`](super::build_schema)
//! 3. Call `ctx.data_unchecked::<DataLoader<RelationLoader<Marker>>>()` in the resolver
//!
//! These loaders do not cache between ticks; per-request memoisation of list
//! fields lives in [`LoaderCache`](super::loader_cache::LoaderCache).

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;
use async_graphql::dataloader::{DataLoader, Loader};

use crate::db::{Database, LinkedUserRecord, MemberTypeRecord, PostRecord, ProfileRecord, UserRecord};

// ============================================================================
// Generic Relation Loader
// ============================================================================

/// A relation that can be fetched for many parent keys at once.
pub trait BatchRelation: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Name used in log lines
    const NAME: &'static str;

    /// Fetch every related item for all `keys` in one query
    fn fetch(db: &Database, keys: &[String]) -> impl Future<Output = Result<Vec<Self::Item>>> + Send;

    /// The parent key an item belongs to
    fn parent_key(item: &Self::Item) -> &str;
}

/// Batches lookups for one [`BatchRelation`] and groups results by parent key.
///
/// # Example
///
/// ```ignore
/// // Register in schema
/// let posts_loader = DataLoader::new(RelationLoader::<PostsByAuthor>::new(db.clone()), tokio::spawn);
/// schema.data(posts_loader);
///
/// // Use in resolver
/// let loader = ctx.data_unchecked::<DataLoader<RelationLoader<PostsByAuthor>>>();
/// let posts = loader.load_one(user_id).await?.unwrap_or_default();
/// ```
pub struct RelationLoader<R: BatchRelation> {
    pub db: Database,
    _relation: PhantomData<fn() -> R>,
}

impl<R: BatchRelation> RelationLoader<R> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _relation: PhantomData,
        }
    }
}

impl<R: BatchRelation> Loader<String> for RelationLoader<R> {
    type Value = Vec<R::Item>;
    type Error = Arc<anyhow::Error>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        tracing::debug!(
            relation = R::NAME,
            parent_count = keys.len(),
            "Batch loading {} for {} parents",
            R::NAME,
            keys.len()
        );

        let items = R::fetch(&self.db, keys).await.map_err(Arc::new)?;
        let total_loaded = items.len();

        let mut result: HashMap<String, Vec<R::Item>> =
            keys.iter().map(|k| (k.clone(), Vec::new())).collect();

        for item in items {
            if let Some(group) = result.get_mut(R::parent_key(&item)) {
                group.push(item);
            }
        }

        tracing::debug!(
            relation = R::NAME,
            total_loaded = total_loaded,
            "Batch load complete"
        );

        Ok(result)
    }
}

/// Convenience alias for a registered relation loader
pub type RelationDataLoader<R> = DataLoader<RelationLoader<R>>;

// ============================================================================
// Relations
// ============================================================================

/// Users by primary key (`Post.author`, `Profile.user`)
pub struct UsersById;

impl BatchRelation for UsersById {
    type Item = UserRecord;
    const NAME: &'static str = "users_by_id";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<UserRecord>> {
        db.users().get_by_ids(keys).await
    }

    fn parent_key(item: &UserRecord) -> &str {
        &item.id
    }
}

/// Membership tiers by primary key (`Profile.memberType`)
pub struct MemberTypesById;

impl BatchRelation for MemberTypesById {
    type Item = MemberTypeRecord;
    const NAME: &'static str = "member_types_by_id";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<MemberTypeRecord>> {
        db.member_types().get_by_ids(keys).await
    }

    fn parent_key(item: &MemberTypeRecord) -> &str {
        &item.id
    }
}

/// Posts by author (`User.posts`)
pub struct PostsByAuthor;

impl BatchRelation for PostsByAuthor {
    type Item = PostRecord;
    const NAME: &'static str = "posts_by_author";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<PostRecord>> {
        db.posts().list_by_authors(keys).await
    }

    fn parent_key(item: &PostRecord) -> &str {
        &item.author_id
    }
}

/// Profile by owning user (`User.profile`)
pub struct ProfileByUser;

impl BatchRelation for ProfileByUser {
    type Item = ProfileRecord;
    const NAME: &'static str = "profile_by_user";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<ProfileRecord>> {
        db.profiles().list_by_users(keys).await
    }

    fn parent_key(item: &ProfileRecord) -> &str {
        &item.user_id
    }
}

/// Profiles by membership tier (`MemberType.profiles`)
pub struct ProfilesByMemberType;

impl BatchRelation for ProfilesByMemberType {
    type Item = ProfileRecord;
    const NAME: &'static str = "profiles_by_member_type";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<ProfileRecord>> {
        db.profiles().list_by_member_types(keys).await
    }

    fn parent_key(item: &ProfileRecord) -> &str {
        &item.member_type_id
    }
}

/// Subscribers of each author (`User.subscribedToUser` when not preloaded)
pub struct SubscribersOf;

impl BatchRelation for SubscribersOf {
    type Item = LinkedUserRecord;
    const NAME: &'static str = "subscribers_of";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<LinkedUserRecord>> {
        db.subscriptions().subscribers_of(keys).await
    }

    fn parent_key(item: &LinkedUserRecord) -> &str {
        &item.parent_id
    }
}

/// Authors followed by each subscriber (`User.userSubscribedTo` when not preloaded)
pub struct AuthorsOf;

impl BatchRelation for AuthorsOf {
    type Item = LinkedUserRecord;
    const NAME: &'static str = "authors_of";

    async fn fetch(db: &Database, keys: &[String]) -> Result<Vec<LinkedUserRecord>> {
        db.subscriptions().authors_of(keys).await
    }

    fn parent_key(item: &LinkedUserRecord) -> &str {
        &item.parent_id
    }
}
