use async_graphql::{Context, Object, Result};

use crate::db::ProfileRecord;
use crate::graphql::errors::UpstreamExt;
use crate::graphql::loaders::{MemberTypesById, RelationDataLoader, UsersById};
use crate::graphql::scalars::{MemberTypeId, Uuid, output_member_type_id, output_uuid};

use super::{MemberType, User};

#[derive(Debug, Clone)]
pub struct Profile(ProfileRecord);

impl From<ProfileRecord> for Profile {
    fn from(record: ProfileRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl Profile {
    async fn id(&self) -> Result<Uuid> {
        output_uuid(&self.0.id)
    }

    async fn is_male(&self) -> bool {
        self.0.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.0.year_of_birth
    }

    async fn user_id(&self) -> Result<Uuid> {
        output_uuid(&self.0.user_id)
    }

    async fn member_type_id(&self) -> Result<MemberTypeId> {
        output_member_type_id(&self.0.member_type_id)
    }

    async fn user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let loader = ctx.data_unchecked::<RelationDataLoader<UsersById>>();
        let users = loader.load_one(self.0.user_id.clone()).await.upstream()?;
        Ok(users.and_then(|u| u.into_iter().next()).map(User::from))
    }

    async fn member_type(&self, ctx: &Context<'_>) -> Result<Option<MemberType>> {
        let loader = ctx.data_unchecked::<RelationDataLoader<MemberTypesById>>();
        let tiers = loader
            .load_one(self.0.member_type_id.clone())
            .await
            .upstream()?;
        Ok(tiers
            .and_then(|t| t.into_iter().next())
            .map(MemberType::from))
    }
}
