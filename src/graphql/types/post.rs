use async_graphql::{Context, Object, Result};

use crate::db::PostRecord;
use crate::graphql::errors::UpstreamExt;
use crate::graphql::loaders::{RelationDataLoader, UsersById};
use crate::graphql::scalars::{Uuid, output_uuid};

use super::User;

#[derive(Debug, Clone)]
pub struct Post(PostRecord);

impl From<PostRecord> for Post {
    fn from(record: PostRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl Post {
    async fn id(&self) -> Result<Uuid> {
        output_uuid(&self.0.id)
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn author_id(&self) -> Result<Uuid> {
        output_uuid(&self.0.author_id)
    }

    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = ctx.data_unchecked::<RelationDataLoader<UsersById>>();
        let users = loader.load_one(self.0.author_id.clone()).await.upstream()?;
        Ok(users.and_then(|u| u.into_iter().next()).map(User::from))
    }
}
