use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::{Context, Object, Result};

use crate::db::{UserListEntry, UserRecord};
use crate::graphql::context::RequestContextExt;
use crate::graphql::descriptors::{SUBSCRIBED_TO_USER, USER_SUBSCRIBED_TO};
use crate::graphql::errors::UpstreamExt;
use crate::graphql::loaders::{
    AuthorsOf, PostsByAuthor, ProfileByUser, RelationDataLoader, SubscribersOf,
};
use crate::graphql::scalars::{Uuid, output_uuid};

use super::{Post, Profile};

/// The result of one batched `users` fetch, shared by every `User` built from it
#[derive(Debug)]
pub struct UserPage {
    entries: Vec<UserListEntry>,
    index: HashMap<String, usize>,
}

impl UserPage {
    pub fn new(entries: Vec<UserListEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.user.id.clone(), i))
            .collect();
        Self { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every user in the page, in fetch order
    pub fn users(page: &Arc<UserPage>) -> Vec<User> {
        (0..page.entries.len())
            .map(|i| User::in_page(page.clone(), i))
            .collect()
    }

    /// Users in the page with the given ids, in id order. Unknown ids are skipped.
    pub fn linked(page: &Arc<UserPage>, ids: &[String]) -> Vec<User> {
        ids.iter()
            .filter_map(|id| page.index.get(id))
            .map(|&i| User::in_page(page.clone(), i))
            .collect()
    }

    fn edges(&self, index: usize, field: &str) -> Option<&[String]> {
        let entry = self.entries.get(index)?;
        match field {
            SUBSCRIBED_TO_USER => entry.subscribed_to_user.as_deref(),
            USER_SUBSCRIBED_TO => entry.user_subscribed_to.as_deref(),
            _ => None,
        }
    }
}

/// A user. Users that came from a batched list keep a slot in that list so
/// their subscription fields can reuse the preloaded edges.
#[derive(Debug, Clone)]
pub struct User {
    record: UserRecord,
    page: Option<(Arc<UserPage>, usize)>,
}

impl User {
    fn in_page(page: Arc<UserPage>, index: usize) -> Self {
        Self {
            record: page.entries[index].user.clone(),
            page: Some((page, index)),
        }
    }

    pub fn record(&self) -> &UserRecord {
        &self.record
    }

    /// Preloaded edge list for `field`, if the enclosing list fetch asked for it
    fn preloaded(&self, ctx: &Context<'_>, field: &str) -> Result<Option<Vec<User>>> {
        let Some((page, index)) = &self.page else {
            return Ok(None);
        };

        let requested = ctx
            .request_context()?
            .requested_user_fields()
            .is_some_and(|fields| fields.contains(field));
        if !requested {
            return Ok(None);
        }

        Ok(page
            .edges(*index, field)
            .map(|ids| UserPage::linked(page, ids)))
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self { record, page: None }
    }
}

#[Object]
impl User {
    async fn id(&self) -> Result<Uuid> {
        output_uuid(&self.record.id)
    }

    async fn name(&self) -> &str {
        &self.record.name
    }

    async fn balance(&self) -> f64 {
        self.record.balance
    }

    async fn profile(&self, ctx: &Context<'_>) -> Result<Option<Profile>> {
        let loader = ctx.data_unchecked::<RelationDataLoader<ProfileByUser>>();
        let profiles = loader.load_one(self.record.id.clone()).await.upstream()?;
        Ok(profiles
            .and_then(|p| p.into_iter().next())
            .map(Profile::from))
    }

    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let loader = ctx.data_unchecked::<RelationDataLoader<PostsByAuthor>>();
        let posts = loader.load_one(self.record.id.clone()).await.upstream()?;
        Ok(posts.unwrap_or_default().into_iter().map(Post::from).collect())
    }

    /// Authors this user follows
    async fn user_subscribed_to(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        if let Some(users) = self.preloaded(ctx, USER_SUBSCRIBED_TO)? {
            return Ok(users);
        }
        let loader = ctx.data_unchecked::<RelationDataLoader<AuthorsOf>>();
        let linked = loader.load_one(self.record.id.clone()).await.upstream()?;
        Ok(linked
            .unwrap_or_default()
            .into_iter()
            .map(|r| User::from(UserRecord::from(r)))
            .collect())
    }

    /// Users following this user
    async fn subscribed_to_user(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        if let Some(users) = self.preloaded(ctx, SUBSCRIBED_TO_USER)? {
            return Ok(users);
        }
        let loader = ctx.data_unchecked::<RelationDataLoader<SubscribersOf>>();
        let linked = loader.load_one(self.record.id.clone()).await.upstream()?;
        Ok(linked
            .unwrap_or_default()
            .into_iter()
            .map(|r| User::from(UserRecord::from(r)))
            .collect())
    }
}
