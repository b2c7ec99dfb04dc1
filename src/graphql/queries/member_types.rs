use super::prelude::*;

#[derive(Default)]
pub struct MemberTypeQueries;

#[Object]
impl MemberTypeQueries {
    /// All membership tiers
    async fn member_types(&self, ctx: &Context<'_>) -> Result<Vec<MemberType>> {
        let db = ctx.data_unchecked::<Database>();
        let records = db.member_types().list().await.upstream()?;
        Ok(records.into_iter().map(MemberType::from).collect())
    }

    /// Get a membership tier by ID
    async fn member_type(&self, ctx: &Context<'_>, id: MemberTypeId) -> Result<Option<MemberType>> {
        let db = ctx.data_unchecked::<Database>();
        let record = db.member_types().get_by_id(id.as_str()).await.upstream()?;
        Ok(record.map(MemberType::from))
    }
}
