use async_graphql::{Context, Object, Result};

use crate::db::MemberTypeRecord;
use crate::graphql::errors::UpstreamExt;
use crate::graphql::loaders::{ProfilesByMemberType, RelationDataLoader};
use crate::graphql::scalars::{MemberTypeId, output_member_type_id};

use super::Profile;

/// Membership tier
#[derive(Debug, Clone)]
pub struct MemberType(MemberTypeRecord);

impl From<MemberTypeRecord> for MemberType {
    fn from(record: MemberTypeRecord) -> Self {
        Self(record)
    }
}

#[Object]
impl MemberType {
    async fn id(&self) -> Result<MemberTypeId> {
        output_member_type_id(&self.0.id)
    }

    async fn discount(&self) -> f64 {
        self.0.discount
    }

    async fn posts_limit_per_month(&self) -> i32 {
        self.0.posts_limit_per_month
    }

    async fn profiles(&self, ctx: &Context<'_>) -> Result<Vec<Profile>> {
        let loader = ctx.data_unchecked::<RelationDataLoader<ProfilesByMemberType>>();
        let profiles = loader.load_one(self.0.id.clone()).await.upstream()?;
        Ok(profiles
            .unwrap_or_default()
            .into_iter()
            .map(Profile::from)
            .collect())
    }
}
